//! jira2clubhouse - Jira to Clubhouse migration
//!
//! Reads a Jira XML (RSS) project export, converts it into Clubhouse epics,
//! stories, tasks and comments, and either writes the result to a JSON file or
//! uploads it through the Clubhouse REST API.
//!
//! # Architecture
//!
//! - **jira**: Export data model and XML parser
//! - **config**: Config file, status table and user map
//! - **translate**: Classification, translation and linking of items
//! - **clubhouse**: Output entities, REST client and sink traits
//! - **migrate**: Export, upload and workspace cleanup flows

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Pipeline
pub mod clubhouse;
pub mod jira;
pub mod migrate;
pub mod translate;

// Re-exports
pub use error::{MigrationError, Result};
