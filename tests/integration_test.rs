//! Integration tests for jira2clubhouse
//!
//! These tests run the full pipeline from XML export through translation to
//! the export file and the upload sink.

use jira2clubhouse::clubhouse::{DryRunSink, ExportDocument};
use jira2clubhouse::config::{MigrationConfig, UserMap};
use jira2clubhouse::jira::JiraExport;
use jira2clubhouse::migrate;
use jira2clubhouse::translate::{self, Migration, Translator};
use jira2clubhouse::MigrationError;
use tempfile::TempDir;

const USERS: &str = r#"
- jira_username: alice
  project_id: 12
  owner_id: uuid-alice
- jiraUsername: ted
  chProjectID: 299
  chID: uuid-ted
"#;

const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="0.92">
  <channel>
    <title>Jira</title>
    <item>
      <key>EPIC-1</key>
      <type>Epic</type>
      <summary>Launch</summary>
      <description>&lt;p&gt;Go live&lt;/p&gt;</description>
      <created>Mon, 2 Jan 2006 15:04:05 -0700</created>
    </item>
    <item>
      <key>ST-1</key>
      <type>Story</type>
      <summary>Login</summary>
      <status>Done</status>
      <assignee username="unknown-user">Unknown</assignee>
      <reporter username="alice">Alice</reporter>
      <created>Tue, 3 Jan 2006 15:04:05 -0700</created>
      <updated>Wed, 4 Jan 2006 15:04:05 -0700</updated>
      <comments>
        <comment id="1" author="bob" created="Wed, 4 Jan 2006 16:00:00 -0700">
</comment>
      </comments>
      <customfields>
        <customfield id="customfield_10008">
          <customfieldname>Epic Link</customfieldname>
          <customfieldvalues><customfieldvalue>EPIC-1</customfieldvalue></customfieldvalues>
        </customfield>
        <customfield id="customfield_10016">
          <customfieldname>Story point estimate</customfieldname>
          <customfieldvalues><customfieldvalue><![CDATA[3.0]]></customfieldvalue></customfieldvalues>
        </customfield>
      </customfields>
    </item>
    <item>
      <key>SUB-1</key>
      <type>Sub-task</type>
      <parent>ST-1</parent>
      <summary>&lt;b&gt;Validate&lt;/b&gt; input</summary>
      <created>Tue, 3 Jan 2006 16:00:00 -0700</created>
    </item>
  </channel>
</rss>
"#;

fn translator() -> Translator {
    Translator::new(&MigrationConfig::default(), UserMap::parse(USERS).unwrap())
}

fn convert(xml: &str) -> jira2clubhouse::Result<Migration> {
    let export = JiraExport::parse(xml)?;
    translate::convert(&export, &translator())
}

mod export_tests {
    use super::*;

    #[test]
    fn test_round_trip_document() {
        let migration = convert(EXPORT).unwrap();
        let document = migrate::export_document(&migration);

        assert_eq!(document.epics.len(), 1);
        assert_eq!(document.epics[0].name, "Launch");
        assert_eq!(document.epics[0].description, "Go live");

        assert_eq!(document.stories.len(), 1);
        let story = &document.stories[0];
        assert_eq!(story.name, "Login");
        assert_eq!(story.project_id, 299);
        assert!(story.owner_ids.is_empty());
        assert_eq!(story.requested_by.as_deref(), Some("uuid-alice"));
        assert_eq!(story.workflow_state_id, 500000012);
        assert_eq!(story.estimate, 3);
        assert_eq!(story.epic_id, None);
        assert_eq!(story.tasks.len(), 1);
        assert_eq!(story.tasks[0].description, "Validate input");
        assert!(!story.tasks[0].complete);

        assert_eq!(story.comments.len(), 1);
        assert_eq!(story.comments[0].text, "bob: (empty)");
        assert_eq!(story.comments[0].author_id.as_deref(), Some("uuid-ted"));

        let jira_labels = story.labels.iter().filter(|l| l.name == "jira").count();
        assert_eq!(jira_labels, 1);
    }

    #[test]
    fn test_export_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clubhouse.json");

        let migration = convert(EXPORT).unwrap();
        migrate::write_export(&path, &migrate::export_document(&migration)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("epic_id"));
        assert!(!content.contains("EPIC-1"));

        let document: ExportDocument = serde_json::from_str(&content).unwrap();
        assert_eq!(document.stories[0].owner_ids, Vec::<String>::new());
        assert_eq!(document.stories[0].labels[0].name, "jira");
    }

    #[test]
    fn test_orphaned_subtask_fails_without_output() {
        let xml = EXPORT.replace("<parent>ST-1</parent>", "<parent>ST-404</parent>");
        let result = convert(&xml);

        match result {
            Err(MigrationError::OrphanedSubtask { key, parent }) => {
                assert_eq!(key, "SUB-1");
                assert_eq!(parent, "ST-404");
            }
            other => panic!("expected orphan error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_export() {
        let result = convert("<rss><channel><item><key>A-1</key></channel></rss>");
        assert!(matches!(result, Err(MigrationError::Parse(_))));
    }
}

mod upload_tests {
    use super::*;
    use async_trait::async_trait;
    use jira2clubhouse::clubhouse::{ClubhouseSink, EpicRequest, StoryRequest};
    use std::sync::Mutex;

    struct CapturingSink {
        stories: Mutex<Vec<StoryRequest>>,
    }

    #[async_trait]
    impl ClubhouseSink for CapturingSink {
        async fn submit_epic(&self, _epic: &EpicRequest) -> jira2clubhouse::Result<i64> {
            Ok(4242)
        }

        async fn submit_story(&self, story: &StoryRequest) -> jira2clubhouse::Result<i64> {
            self.stories.lock().unwrap().push(story.clone());
            Ok(1)
        }
    }

    #[tokio::test]
    async fn test_upload_fills_epic_id() {
        let migration = convert(EXPORT).unwrap();
        let sink = CapturingSink {
            stories: Mutex::new(Vec::new()),
        };

        let report = migrate::upload(&sink, &migration).await;

        assert_eq!(report.epics_created, 1);
        assert_eq!(report.stories_created, 1);
        assert_eq!(report.unresolved_epic_links, 0);
        assert_eq!(sink.stories.lock().unwrap()[0].epic_id, Some(4242));
    }

    #[tokio::test]
    async fn test_dry_run_upload() {
        let migration = convert(EXPORT).unwrap();
        let report = migrate::upload(&DryRunSink::new(), &migration).await;

        assert_eq!(report.epics_created, 1);
        assert_eq!(report.stories_created, 1);
        assert!(!report.has_failures());
    }
}
