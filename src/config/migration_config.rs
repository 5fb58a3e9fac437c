//! Migration configuration file handling
//!
//! Loads ~/.config/jira2clubhouse/config.yaml. Every section is optional; a
//! missing file or a missing section falls back to the values the migration
//! was first run with.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Clubhouse workflow states a Jira status can land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowState {
    ReadyForTest,
    InProgress,
    Selected,
    Backlog,
    Completed,
    Closed,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::Backlog
    }
}

/// Clubhouse API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubhouseSettings {
    /// Base URL of the REST API, without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.clubhouse.io/api/v3".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for ClubhouseSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Fallbacks applied when a Jira user has no Clubhouse counterpart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSettings {
    /// Project that receives stories of unmapped assignees
    #[serde(default = "default_fallback_project")]
    pub fallback_project_id: i64,

    /// Jira username whose Clubhouse identity stands in for unmapped
    /// reporters and comment authors
    #[serde(default = "default_fallback_username")]
    pub fallback_username: String,
}

fn default_fallback_project() -> i64 {
    299
}

fn default_fallback_username() -> String {
    "ted".to_string()
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            fallback_project_id: default_fallback_project(),
            fallback_username: default_fallback_username(),
        }
    }
}

/// Numeric Clubhouse ids of each workflow state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowStateIds {
    pub ready_for_test: i64,
    pub in_progress: i64,
    pub selected: i64,
    pub backlog: i64,
    pub completed: i64,
    pub closed: i64,
}

impl Default for WorkflowStateIds {
    fn default() -> Self {
        Self {
            ready_for_test: 500000010,
            in_progress: 500000015,
            selected: 500000011,
            backlog: 500000014,
            completed: 500000012,
            closed: 500000021,
        }
    }
}

impl WorkflowStateIds {
    /// Clubhouse id for a workflow state
    pub fn id(&self, state: WorkflowState) -> i64 {
        match state {
            WorkflowState::ReadyForTest => self.ready_for_test,
            WorkflowState::InProgress => self.in_progress,
            WorkflowState::Selected => self.selected,
            WorkflowState::Backlog => self.backlog,
            WorkflowState::Completed => self.completed,
            WorkflowState::Closed => self.closed,
        }
    }
}

/// Jira status names mapped to workflow states (exact, case-sensitive)
fn default_statuses() -> HashMap<String, WorkflowState> {
    [
        ("Ready for Test", WorkflowState::ReadyForTest),
        ("Task In Progress", WorkflowState::InProgress),
        ("Selected for Review/Development", WorkflowState::Selected),
        ("Task backlog", WorkflowState::Backlog),
        ("Done", WorkflowState::Completed),
        ("Verified", WorkflowState::Completed),
        ("Closed", WorkflowState::Closed),
    ]
    .into_iter()
    .map(|(status, state)| (status.to_string(), state))
    .collect()
}

/// Complete migration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    #[serde(default)]
    pub clubhouse: ClubhouseSettings,

    #[serde(default)]
    pub migration: MigrationSettings,

    #[serde(default)]
    pub workflow_states: WorkflowStateIds,

    /// Replaces the whole status table when present
    #[serde(default = "default_statuses")]
    pub statuses: HashMap<String, WorkflowState>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            clubhouse: ClubhouseSettings::default(),
            migration: MigrationSettings::default(),
            workflow_states: WorkflowStateIds::default(),
            statuses: default_statuses(),
        }
    }
}

impl MigrationConfig {
    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::MigrationError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading migration configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            api_url = %config.clubhouse.api_url,
            statuses = config.statuses.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load an explicit config file, or the default one when it exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Self::default_path();
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            tracing::debug!("No config file, using built-in defaults");
            Ok(Self::default())
        }
    }

    /// Get the default config path (~/.config/jira2clubhouse/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("jira2clubhouse");
        path.push("config.yaml");
        path
    }

    /// Workflow state id for a Jira status; unknown or empty means backlog
    pub fn state_id_for_status(&self, status: &str) -> i64 {
        let state = self.statuses.get(status).copied().unwrap_or_default();
        self.workflow_states.id(state)
    }
}
