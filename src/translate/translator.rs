//! Jira item → Clubhouse entity translation

use super::resolver::{Attribution, Resolver};
use super::sanitize::sanitize_html;
use super::timestamp::{parse_jira_timestamp, parse_jira_timestamp_with_delta};
use crate::clubhouse::{Comment, Epic, Story, StoryType, Task};
use crate::config::{MigrationConfig, UserMap, WorkflowState, WorkflowStateIds};
use crate::jira::{JiraComment, JiraItem};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Label every migrated story carries
pub const MIGRATION_LABEL: &str = "jira";

/// Comment text used when the body has no content
pub const EMPTY_COMMENT: &str = "(empty)";

/// Converts Jira items into Clubhouse entities
#[derive(Debug)]
pub struct Translator {
    resolver: Resolver,
    statuses: HashMap<String, WorkflowState>,
    state_ids: WorkflowStateIds,
    now: DateTime<Utc>,
}

impl Translator {
    pub fn new(config: &MigrationConfig, users: UserMap) -> Self {
        Self {
            resolver: Resolver::new(users, &config.migration),
            statuses: config.statuses.clone(),
            state_ids: config.workflow_states.clone(),
            now: Utc::now(),
        }
    }

    /// Use a fixed instant for timestamps that cannot be parsed
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn timestamp_or_now(&self, text: &str) -> DateTime<Utc> {
        parse_jira_timestamp(text).unwrap_or(self.now)
    }

    fn workflow_state_id(&self, status: &str) -> i64 {
        let state = self.statuses.get(status).copied().unwrap_or_default();
        self.state_ids.id(state)
    }

    pub fn translate_epic(&self, item: &JiraItem) -> Epic {
        Epic {
            key: item.key.clone(),
            created_at: self.timestamp_or_now(&item.created),
            name: sanitize_html(&item.summary),
            description: sanitize_html(&item.description),
        }
    }

    pub fn translate_task(&self, item: &JiraItem) -> Task {
        Task {
            key: item.key.clone(),
            parent: item.parent.clone(),
            created_at: self.timestamp_or_now(&item.created),
            description: sanitize_html(&item.summary),
            complete: false,
        }
    }

    pub fn translate_comment(&self, comment: &JiraComment) -> Comment {
        let mut text = sanitize_html(&comment.body);
        if text.trim().is_empty() {
            text = EMPTY_COMMENT.to_string();
        }

        let author_id = match self.resolver.comment_author(&comment.author) {
            Attribution::Mapped(id) => Some(id),
            Attribution::Fallback(fallback) => {
                if !comment.author.is_empty() {
                    text = format!("{}: {}", comment.author, text);
                }
                fallback
            }
        };

        Comment {
            text,
            created_at: self.timestamp_or_now(&comment.created),
            author_id,
        }
    }

    /// Story for a non-epic, non-sub-task item; tasks are attached later
    pub fn translate_story(&self, item: &JiraItem) -> Story {
        let comments = item
            .comments
            .iter()
            .map(|c| self.translate_comment(c))
            .collect();

        let labels = story_labels(item);
        let assignee = self.resolver.resolve(&item.assignee);
        let workflow_state_id = self.workflow_state_id(&item.status);
        let requested_by = self.resolver.requester(&item.reporter);

        let completed_at = parse_jira_timestamp(&item.resolved);
        let started_at = parse_jira_timestamp_with_delta(&item.resolved, -1);

        let story = Story {
            key: item.key.clone(),
            epic_link: item.epic_link().map(str::to_string),
            name: sanitize_html(&item.summary),
            description: sanitize_html(&item.description),
            created_at: self.timestamp_or_now(&item.created),
            updated_at: self.timestamp_or_now(&item.updated),
            completed_at,
            started_at,
            estimate: item.estimate(),
            labels,
            project_id: assignee.project_id,
            workflow_state_id,
            owner_ids: assignee.owner_id.into_iter().collect(),
            requested_by,
            story_type: if item.is_bug() {
                StoryType::Bug
            } else {
                StoryType::Feature
            },
            comments,
            tasks: Vec::new(),
        };

        debug!(
            key = %story.key,
            project_id = story.project_id,
            workflow_state_id = story.workflow_state_id,
            labels = story.labels.len(),
            "Translated story"
        );

        story
    }
}

/// Lowercased item labels, then the last sprint, then the migration label.
/// Empty and repeated labels are dropped.
fn story_labels(item: &JiraItem) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(item.labels.len() + 2);

    let candidates = item
        .labels
        .iter()
        .map(String::as_str)
        .chain(item.last_sprint())
        .chain(std::iter::once(MIGRATION_LABEL));

    for label in candidates {
        let label = label.trim().to_lowercase();
        if !label.is_empty() && !labels.contains(&label) {
            labels.push(label);
        }
    }

    labels
}
