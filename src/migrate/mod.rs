//! Run-level flows over a converted migration
//!
//! - **export**: write the wire document to a file
//! - **upload**: submit epics and stories to a sink
//! - **cleanup**: prune empty epics and archived stories remotely

mod cleanup;
mod export;
mod upload;

pub use cleanup::{prune_empty_epics, purge_archived_stories, CleanupReport};
pub use export::{export_document, write_export};
pub use upload::{upload, UploadReport};
