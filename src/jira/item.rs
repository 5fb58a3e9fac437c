//! Jira export data model
//!
//! One `JiraItem` per `<item>` of the RSS export. Values are kept as the raw
//! strings Jira wrote; interpretation (sanitizing, timestamp parsing, user
//! resolution) happens during translation.

/// Custom field carrying the key of the item's epic
pub const EPIC_LINK_FIELD: &str = "Epic Link";

/// Custom field carrying story points
pub const ESTIMATE_FIELD: &str = "Story point estimate";

/// Custom field listing every sprint the item was part of
pub const SPRINT_FIELD: &str = "Sprint";

/// How an item is migrated, decided by its Jira type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Epic,
    SubTask,
    /// Everything else: stories, bugs, tasks
    Story,
}

impl ItemKind {
    pub fn from_type(item_type: &str) -> Self {
        match item_type {
            "Epic" => Self::Epic,
            "Sub-task" => Self::SubTask,
            _ => Self::Story,
        }
    }
}

/// A parsed Jira export
#[derive(Debug, Clone, Default)]
pub struct JiraExport {
    pub items: Vec<JiraItem>,
}

/// A single Jira issue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JiraItem {
    pub key: String,
    pub item_type: String,
    pub title: String,
    pub project: String,
    pub summary: String,
    /// HTML-bearing body
    pub description: String,
    pub status: String,
    pub assignee: String,
    pub reporter: String,
    /// Parent key, only set on sub-tasks
    pub parent: String,
    pub labels: Vec<String>,
    pub comments: Vec<JiraComment>,
    pub custom_fields: Vec<JiraCustomField>,
    pub created: String,
    pub updated: String,
    pub resolved: String,
}

/// A comment on a Jira issue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JiraComment {
    pub id: String,
    pub author: String,
    pub created: String,
    /// HTML-bearing body
    pub body: String,
}

/// A custom field with its values in export order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JiraCustomField {
    pub name: String,
    pub values: Vec<String>,
}

impl JiraCustomField {
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl JiraItem {
    pub fn kind(&self) -> ItemKind {
        ItemKind::from_type(&self.item_type)
    }

    /// Custom fields with the given name, in export order
    fn custom_fields_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a JiraCustomField> + 'a {
        self.custom_fields.iter().filter(move |f| f.name == name)
    }

    /// Key of the epic this item belongs to
    pub fn epic_link(&self) -> Option<&str> {
        self.custom_fields_named(EPIC_LINK_FIELD)
            .find_map(|f| f.values.first())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Story points truncated to a whole number; 0 when absent or unparsable
    pub fn estimate(&self) -> i64 {
        self.custom_fields_named(ESTIMATE_FIELD)
            .filter_map(|f| f.values.first())
            .find_map(|v| v.trim().parse::<f64>().ok())
            .map(|points| points.trunc() as i64)
            .unwrap_or(0)
    }

    /// Most recent sprint the item was in
    pub fn last_sprint(&self) -> Option<&str> {
        self.custom_fields_named(SPRINT_FIELD)
            .find_map(|f| f.values.last())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_bug(&self) -> bool {
        self.item_type == "Bug"
    }
}
