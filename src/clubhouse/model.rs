//! Clubhouse entities
//!
//! Two layers:
//! - domain types (`Epic`, `Story`, `Task`, `Comment`) carry the Jira keys
//!   needed to link entities to each other
//! - wire types (`*Request`, `ExportDocument`) are exactly what the API and
//!   the export file receive; they have no Jira keys
//!
//! `Epic::to_request` and `Story::to_request` are the only way from one layer
//! to the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clubhouse story type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Bug,
    Feature,
}

/// An epic ready to be created
#[derive(Debug, Clone, PartialEq)]
pub struct Epic {
    /// Jira key of the originating item
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub description: String,
}

/// A story ready to be created
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    /// Jira key of the originating item, unique within a run
    pub key: String,
    /// Jira key of the epic this story belongs to
    pub epic_link: Option<String>,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub estimate: i64,
    pub labels: Vec<String>,
    pub project_id: i64,
    pub workflow_state_id: i64,
    pub owner_ids: Vec<String>,
    pub requested_by: Option<String>,
    pub story_type: StoryType,
    pub comments: Vec<Comment>,
    pub tasks: Vec<Task>,
}

/// A checklist task inside a story
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Jira key of the originating sub-task
    pub key: String,
    /// Jira key of the parent story
    pub parent: String,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub complete: bool,
}

/// A story comment
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Option<String>,
}

/// Body of `POST /epics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicRequest {
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub name: String,
}

/// Body of `POST /stories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub comments: Vec<CommentRequest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(
        rename = "completed_at_override",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "started_at_override",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub started_at: Option<DateTime<Utc>>,
    pub description: String,
    pub estimate: i64,
    /// Omitted, never zero, when the story has no epic
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub epic_id: Option<i64>,
    pub labels: Vec<LabelRequest>,
    pub name: String,
    pub project_id: i64,
    pub workflow_state_id: i64,
    pub owner_ids: Vec<String>,
    #[serde(
        rename = "requested_by_id",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub requested_by: Option<String>,
    pub story_type: StoryType,
    pub tasks: Vec<TaskRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author_id: Option<String>,
}

/// The export file: every epic and story of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub epics: Vec<EpicRequest>,
    pub stories: Vec<StoryRequest>,
}

/// The part of an API response the migration needs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedEntity {
    pub id: i64,
}

/// Epic as listed by `GET /epics`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpicSummary {
    pub id: i64,
    pub name: String,
}

/// Story as returned by list and search endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorySummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

impl Epic {
    pub fn to_request(&self) -> EpicRequest {
        EpicRequest {
            created_at: self.created_at,
            description: self.description.clone(),
            name: self.name.clone(),
        }
    }
}

impl Story {
    /// Wire form of this story; `epic_id` comes from whoever resolved the
    /// epic link, and a zero id is treated as no epic
    pub fn to_request(&self, epic_id: Option<i64>) -> StoryRequest {
        StoryRequest {
            comments: self.comments.iter().map(Comment::to_request).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
            started_at: self.started_at,
            description: self.description.clone(),
            estimate: self.estimate,
            epic_id: epic_id.filter(|id| *id != 0),
            labels: self
                .labels
                .iter()
                .map(|name| LabelRequest { name: name.clone() })
                .collect(),
            name: self.name.clone(),
            project_id: self.project_id,
            workflow_state_id: self.workflow_state_id,
            owner_ids: self.owner_ids.clone(),
            requested_by: self.requested_by.clone(),
            story_type: self.story_type,
            tasks: self.tasks.iter().map(Task::to_request).collect(),
        }
    }
}

impl Task {
    pub fn to_request(&self) -> TaskRequest {
        TaskRequest {
            created_at: self.created_at,
            description: self.description.clone(),
            complete: self.complete,
        }
    }
}

impl Comment {
    pub fn to_request(&self) -> CommentRequest {
        CommentRequest {
            text: self.text.clone(),
            created_at: self.created_at,
            author_id: self.author_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 5, 1, 12, 0, 0).unwrap()
    }

    fn story() -> Story {
        Story {
            key: "ST-1".to_string(),
            epic_link: Some("EPIC-1".to_string()),
            name: "Login".to_string(),
            description: "Users log in".to_string(),
            created_at: ts(),
            updated_at: ts(),
            completed_at: None,
            started_at: None,
            estimate: 2,
            labels: vec!["jira".to_string()],
            project_id: 299,
            workflow_state_id: 500000014,
            owner_ids: vec![],
            requested_by: None,
            story_type: StoryType::Feature,
            comments: vec![],
            tasks: vec![Task {
                key: "SUB-1".to_string(),
                parent: "ST-1".to_string(),
                created_at: ts(),
                description: "Validate".to_string(),
                complete: false,
            }],
        }
    }

    #[test]
    fn test_story_without_epic_omits_epic_id() {
        let json = serde_json::to_value(story().to_request(None)).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("epic_id"));
        assert!(!obj.contains_key("key"));
        assert!(!obj.contains_key("epic_link"));
        assert!(!obj.contains_key("completed_at_override"));
        assert!(!obj.contains_key("requested_by_id"));
        assert_eq!(json["owner_ids"], serde_json::json!([]));
        assert_eq!(json["labels"], serde_json::json!([{"name": "jira"}]));
        assert_eq!(json["story_type"], "feature");
        assert_eq!(json["tasks"][0]["complete"], false);
    }

    #[test]
    fn test_zero_epic_id_is_omitted() {
        let request = story().to_request(Some(0));
        assert_eq!(request.epic_id, None);
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("epic_id"));
    }

    #[test]
    fn test_story_with_epic_and_overrides() {
        let mut story = story();
        story.completed_at = Some(ts());
        story.requested_by = Some("uuid-ted".to_string());

        let json = serde_json::to_value(story.to_request(Some(77))).unwrap();
        assert_eq!(json["epic_id"], 77);
        assert_eq!(json["requested_by_id"], "uuid-ted");
        assert_eq!(json["completed_at_override"], "2020-05-01T12:00:00Z");
    }

    #[test]
    fn test_epic_request_has_no_key() {
        let epic = Epic {
            key: "EPIC-1".to_string(),
            created_at: ts(),
            name: "Launch".to_string(),
            description: String::new(),
        };
        let json = serde_json::to_value(epic.to_request()).unwrap();
        assert_eq!(json["name"], "Launch");
        assert!(json.get("key").is_none());
    }

    #[test]
    fn test_created_entity_ignores_extra_fields() {
        let created: CreatedEntity =
            serde_json::from_str(r#"{"id": 42, "name": "Launch", "entity_type": "epic"}"#)
                .unwrap();
        assert_eq!(created.id, 42);
    }
}
