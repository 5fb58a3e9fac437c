//! Translation engine
//!
//! Turns a parsed Jira export into Clubhouse domain entities:
//! - **classify**: split items into epics, sub-tasks and stories
//! - **translator**: per-item conversion (text, labels, states, users)
//! - **linker**: sub-tasks into stories, stories to remote epic ids
//! - **resolver**: Jira usernames to Clubhouse projects and members

mod classify;
mod linker;
mod resolver;
mod sanitize;
mod timestamp;
mod translator;

pub use classify::{classify, Classified};
pub use linker::{attach_tasks, link_epic, EpicLink};
pub use resolver::{Attribution, Resolution, Resolver};
pub use sanitize::sanitize_html;
pub use timestamp::{parse_jira_timestamp, parse_jira_timestamp_with_delta};
pub use translator::{Translator, EMPTY_COMMENT, MIGRATION_LABEL};

use crate::clubhouse::{Epic, Story};
use crate::jira::JiraExport;
use crate::Result;
use std::collections::HashSet;
use tracing::{info, warn};

/// Everything one run creates, with Jira keys still attached
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Migration {
    pub epics: Vec<Epic>,
    pub stories: Vec<Story>,
}

impl Migration {
    pub fn task_count(&self) -> usize {
        self.stories.iter().map(|s| s.tasks.len()).sum()
    }
}

/// Translate and link a whole export
pub fn convert(export: &JiraExport, translator: &Translator) -> Result<Migration> {
    let classified = classify(&export.items);

    let epics: Vec<Epic> = classified
        .epics
        .iter()
        .map(|item| translator.translate_epic(item))
        .collect();
    let tasks = classified
        .subtasks
        .iter()
        .map(|item| translator.translate_task(item))
        .collect();
    let mut stories: Vec<Story> = classified
        .stories
        .iter()
        .map(|item| translator.translate_story(item))
        .collect();

    attach_tasks(&mut stories, tasks)?;

    let epic_keys: HashSet<&str> = epics.iter().map(|e| e.key.as_str()).collect();
    for story in &stories {
        if let Some(link) = story.epic_link.as_deref() {
            if !epic_keys.contains(link) {
                warn!(story = %story.key, epic = %link, "Epic link points outside the export");
            }
        }
    }

    let migration = Migration { epics, stories };
    info!(
        epics = migration.epics.len(),
        stories = migration.stories.len(),
        tasks = migration.task_count(),
        "Converted Jira export"
    );
    Ok(migration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MigrationConfig, UserMap};
    use crate::jira::JiraItem;
    use crate::MigrationError;

    fn item(key: &str, item_type: &str, parent: &str) -> JiraItem {
        JiraItem {
            key: key.to_string(),
            item_type: item_type.to_string(),
            summary: key.to_string(),
            parent: parent.to_string(),
            ..Default::default()
        }
    }

    fn translator() -> Translator {
        Translator::new(&MigrationConfig::default(), UserMap::default())
    }

    #[test]
    fn test_convert_counts() {
        let export = JiraExport {
            items: vec![
                item("E-1", "Epic", ""),
                item("S-1", "Story", ""),
                item("T-1", "Sub-task", "S-1"),
                item("B-1", "Bug", ""),
                item("T-2", "Sub-task", "B-1"),
            ],
        };

        let migration = convert(&export, &translator()).unwrap();
        assert_eq!(migration.epics.len(), 1);
        assert_eq!(migration.stories.len(), 2);
        assert_eq!(migration.task_count(), 2);
        assert_eq!(migration.stories[1].tasks[0].description, "T-2");
    }

    #[test]
    fn test_subtask_under_epic_is_orphaned() {
        let export = JiraExport {
            items: vec![item("E-1", "Epic", ""), item("T-1", "Sub-task", "E-1")],
        };
        let result = convert(&export, &translator());
        assert!(matches!(
            result,
            Err(MigrationError::OrphanedSubtask { ref key, .. }) if key == "T-1"
        ));
    }

    #[test]
    fn test_empty_export() {
        let migration = convert(&JiraExport::default(), &translator()).unwrap();
        assert_eq!(migration, Migration::default());
    }
}
