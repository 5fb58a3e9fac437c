//! Error types for jira2clubhouse
//!
//! Every failure mode of a migration run funnels into one enum. Fatal errors
//! (I/O, parsing, configuration, broken links between items) abort the run;
//! per-item upload failures are logged by the orchestrator and never surface
//! here as a run-level error.

use thiserror::Error;

/// Result type alias for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Error type for migration operations
#[derive(Error, Debug)]
pub enum MigrationError {
    /// Configuration errors (bad config file, missing token, duplicate user)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed Jira XML export
    #[error("Parse error: {0}")]
    Parse(String),

    /// YAML parsing errors (config file, user map)
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Clubhouse answered with a non-success status
    #[error("Clubhouse API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// A sub-task whose parent is not among the translated stories
    #[error("Sub-task {key} references parent {parent}, which is not a story in this export")]
    OrphanedSubtask { key: String, parent: String },

    /// Two stories with the same Jira key
    #[error("Duplicate story key: {0}")]
    DuplicateKey(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl MigrationError {
    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            MigrationError::Api { status, .. } => Some(*status),
            MigrationError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
