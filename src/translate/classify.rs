//! Partition of export items by how they migrate

use crate::jira::{ItemKind, JiraItem};

/// Items split by kind, each list in export order
#[derive(Debug, Default)]
pub struct Classified<'a> {
    pub epics: Vec<&'a JiraItem>,
    pub subtasks: Vec<&'a JiraItem>,
    pub stories: Vec<&'a JiraItem>,
}

impl Classified<'_> {
    pub fn len(&self) -> usize {
        self.epics.len() + self.subtasks.len() + self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// "Epic" → epics, "Sub-task" → subtasks, anything else → stories
pub fn classify(items: &[JiraItem]) -> Classified<'_> {
    let mut classified = Classified::default();
    for item in items {
        match item.kind() {
            ItemKind::Epic => classified.epics.push(item),
            ItemKind::SubTask => classified.subtasks.push(item),
            ItemKind::Story => classified.stories.push(item),
        }
    }
    classified
}
