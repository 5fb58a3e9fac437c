//! Jira user → Clubhouse project/owner resolution
//!
//! An unmapped user never stops a migration: the story lands in the fallback
//! project without an owner, and reporters/comment authors are attributed to
//! the fallback identity. Each unmapped username is reported once.

use crate::config::{MigrationSettings, UserMap};
use std::cell::RefCell;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Project and owner for one Jira user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub project_id: i64,
    pub owner_id: Option<String>,
}

/// Who a comment is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribution {
    /// The author has a Clubhouse identity
    Mapped(String),
    /// The author is unmapped; the fallback identity (if any) stands in
    Fallback(Option<String>),
}

/// Resolves usernames against a read-only user map
#[derive(Debug)]
pub struct Resolver {
    users: UserMap,
    fallback_project_id: i64,
    fallback_username: String,
    unmapped: RefCell<BTreeSet<String>>,
}

impl Resolver {
    pub fn new(users: UserMap, settings: &MigrationSettings) -> Self {
        Self {
            users,
            fallback_project_id: settings.fallback_project_id,
            fallback_username: settings.fallback_username.clone(),
            unmapped: RefCell::new(BTreeSet::new()),
        }
    }

    /// Project and owner of a user; fallback project and no owner when unmapped
    pub fn resolve(&self, username: &str) -> Resolution {
        match self.users.get(username) {
            Some(entry) => Resolution {
                project_id: if entry.project_id > 0 {
                    entry.project_id
                } else {
                    self.fallback_project_id
                },
                owner_id: Some(entry.owner_id.trim())
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
            },
            None => {
                self.note_unmapped(username);
                Resolution {
                    project_id: self.fallback_project_id,
                    owner_id: None,
                }
            }
        }
    }

    pub fn owner(&self, username: &str) -> Option<String> {
        self.resolve(username).owner_id
    }

    /// Owner of the configured fallback user
    pub fn fallback_owner(&self) -> Option<String> {
        let owner = self
            .users
            .get(&self.fallback_username)
            .map(|entry| entry.owner_id.trim().to_string())
            .filter(|id| !id.is_empty());
        if owner.is_none() {
            self.note_unmapped(&self.fallback_username);
        }
        owner
    }

    /// Requester of a story: the reporter, or the fallback identity
    pub fn requester(&self, reporter: &str) -> Option<String> {
        self.owner(reporter).or_else(|| self.fallback_owner())
    }

    pub fn comment_author(&self, author: &str) -> Attribution {
        match self.owner(author) {
            Some(id) => Attribution::Mapped(id),
            None => Attribution::Fallback(self.fallback_owner()),
        }
    }

    /// Usernames that had no (complete) mapping, sorted
    pub fn unmapped_users(&self) -> Vec<String> {
        self.unmapped.borrow().iter().cloned().collect()
    }

    fn note_unmapped(&self, username: &str) {
        if username.is_empty() {
            debug!("Item has no user, using fallback");
            return;
        }
        if self.unmapped.borrow_mut().insert(username.to_string()) {
            warn!(
                username = %username,
                fallback_project = self.fallback_project_id,
                "JIRA user not found in user map"
            );
        }
    }
}
