//! Clubhouse output side
//!
//! - **model**: domain entities (with Jira keys) and their wire projections
//! - **client**: REST adapter for the Clubhouse v3 API
//! - **sink**: traits the upload and cleanup flows are written against

pub mod client;
pub mod model;
pub mod sink;

pub use client::ClubhouseClient;
pub use model::{
    Comment, CommentRequest, CreatedEntity, Epic, EpicRequest, EpicSummary, ExportDocument,
    LabelRequest, Story, StoryRequest, StorySummary, StoryType, Task, TaskRequest,
};
pub use sink::{ClubhouseSink, ClubhouseWorkspace, DryRunSink};
