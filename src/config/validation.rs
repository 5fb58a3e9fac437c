//! Configuration validation
//!
//! Checks a loaded configuration before any item is translated:
//! - API URL is http(s)
//! - Timeout and fallback project are positive
//! - Workflow state ids are positive
//! - Fallback username is set

use super::migration_config::MigrationConfig;
use crate::MigrationError;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a migration configuration
pub fn validate_config(config: &MigrationConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let url = &config.clubhouse.api_url;
    if !url.starts_with("https://") && !url.starts_with("http://") {
        errors.push(ValidationError::new(
            "clubhouse.api_url",
            format!("Must be an http(s) URL, got '{}'", url),
        ));
    }

    if config.clubhouse.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "clubhouse.request_timeout_secs",
            "Must be greater than zero",
        ));
    }

    if config.migration.fallback_project_id <= 0 {
        errors.push(ValidationError::new(
            "migration.fallback_project_id",
            "Must be a positive Clubhouse project id",
        ));
    }

    if config.migration.fallback_username.trim().is_empty() {
        errors.push(ValidationError::new(
            "migration.fallback_username",
            "Must name a Jira user present in the user map",
        ));
    }

    let ids = &config.workflow_states;
    for (field, id) in [
        ("ready_for_test", ids.ready_for_test),
        ("in_progress", ids.in_progress),
        ("selected", ids.selected),
        ("backlog", ids.backlog),
        ("completed", ids.completed),
        ("closed", ids.closed),
    ] {
        if id <= 0 {
            errors.push(ValidationError::new(
                format!("workflow_states.{}", field),
                "Must be a positive workflow state id",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate and fold all problems into a single configuration error
pub fn validate_config_result(config: &MigrationConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let details = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");
        MigrationError::Config(format!("Invalid configuration:\n{}", details))
    })
}
