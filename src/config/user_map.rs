//! Jira username to Clubhouse identity table
//!
//! Loaded once before translation and never mutated. The file is a YAML (or
//! JSON) list of entries:
//!
//! ```yaml
//! - jira_username: alice
//!   project_id: 12
//!   owner_id: 5b1f0c0e-0000-4000-8000-000000000001
//! ```

use crate::{MigrationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One row of the user map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMapping {
    #[serde(alias = "jiraUsername")]
    pub jira_username: String,

    /// Clubhouse project receiving this user's stories (0 = none)
    #[serde(default, alias = "chProjectID")]
    pub project_id: i64,

    /// Clubhouse member UUID (empty = none)
    #[serde(default, alias = "chID")]
    pub owner_id: String,
}

impl UserMapping {
    pub fn new(
        jira_username: impl Into<String>,
        project_id: i64,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            jira_username: jira_username.into(),
            project_id,
            owner_id: owner_id.into(),
        }
    }
}

/// Read-only lookup table keyed by Jira username
#[derive(Debug, Clone, Default)]
pub struct UserMap {
    entries: HashMap<String, UserMapping>,
}

impl UserMap {
    /// Build a map, rejecting duplicate usernames
    pub fn from_entries(entries: Vec<UserMapping>) -> Result<Self> {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            if map.contains_key(&entry.jira_username) {
                return Err(MigrationError::Config(format!(
                    "Duplicate user map entry: {}",
                    entry.jira_username
                )));
            }
            map.insert(entry.jira_username.clone(), entry);
        }
        Ok(Self { entries: map })
    }

    /// Parse a user map document
    pub fn parse(content: &str) -> Result<Self> {
        let entries: Vec<UserMapping> = serde_yaml::from_str(content)?;
        Self::from_entries(entries)
    }

    /// Load a user map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let map = Self::parse(&content)?;
        tracing::info!(path = %path.display(), users = map.len(), "Loaded user map");
        Ok(map)
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, jira_username: &str) -> Option<&UserMapping> {
        self.entries.get(jira_username)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
