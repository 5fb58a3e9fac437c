//! Configuration system
//!
//! Two inputs shape a migration run:
//! - the optional config file (~/.config/jira2clubhouse/config.yaml) with API
//!   settings, fallback identities and the status → workflow state table
//! - the user map, a list of Jira usernames with their Clubhouse project and
//!   member ids

mod migration_config;
mod user_map;
pub mod validation;

pub use migration_config::{
    ClubhouseSettings, MigrationConfig, MigrationSettings, WorkflowState, WorkflowStateIds,
};
pub use user_map::{UserMap, UserMapping};
pub use validation::{validate_config, validate_config_result, ValidationError};
