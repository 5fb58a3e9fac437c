//! Cross-entity linking by Jira key
//!
//! Tasks find their story during translation; stories find their epic's
//! remote id only once the epics exist in Clubhouse.

use crate::clubhouse::{Story, Task};
use crate::{MigrationError, Result};
use std::collections::HashMap;

/// Append every task to the story whose key is the task's parent
///
/// Fails on a duplicate story key or a task whose parent is not a story of
/// this run; nothing is attached in either case.
pub fn attach_tasks(stories: &mut [Story], tasks: Vec<Task>) -> Result<()> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(stories.len());
    for (position, story) in stories.iter().enumerate() {
        if index.insert(story.key.clone(), position).is_some() {
            return Err(MigrationError::DuplicateKey(story.key.clone()));
        }
    }

    let mut placed = Vec::with_capacity(tasks.len());
    for task in tasks {
        match index.get(&task.parent) {
            Some(&position) => placed.push((position, task)),
            None => {
                return Err(MigrationError::OrphanedSubtask {
                    key: task.key,
                    parent: task.parent,
                })
            }
        }
    }

    for (position, task) in placed {
        stories[position].tasks.push(task);
    }
    Ok(())
}

/// Outcome of resolving a story's epic link against created epics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpicLink {
    /// The story has no epic
    None,
    /// The epic was created with this id
    Resolved(i64),
    /// The story names an epic that has no remote id
    Unresolved,
}

impl EpicLink {
    pub fn id(self) -> Option<i64> {
        match self {
            Self::Resolved(id) => Some(id),
            Self::None | Self::Unresolved => None,
        }
    }
}

/// Look up the remote id of a story's epic
pub fn link_epic(story: &Story, created: &HashMap<String, i64>) -> EpicLink {
    match story.epic_link.as_deref() {
        None => EpicLink::None,
        Some(key) => match created.get(key) {
            Some(&id) => EpicLink::Resolved(id),
            None => EpicLink::Unresolved,
        },
    }
}
