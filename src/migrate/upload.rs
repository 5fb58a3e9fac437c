//! Upload orchestration
//!
//! Epics go first so stories can reference their remote ids. A failed
//! submission is logged and counted; the upload always runs to the end.

use crate::clubhouse::ClubhouseSink;
use crate::translate::{link_epic, EpicLink, Migration};
use crate::MigrationError;
use std::collections::HashMap;
use tracing::{info, warn};

/// Outcome of an upload
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub epics_created: u32,
    pub epics_failed: u32,
    pub stories_created: u32,
    pub stories_failed: u32,
    /// Stories whose epic was not created (missing from the export or failed)
    pub unresolved_epic_links: u32,
}

impl UploadReport {
    pub fn has_failures(&self) -> bool {
        self.epics_failed > 0 || self.stories_failed > 0
    }
}

fn log_failure(kind: &str, key: &str, error: &MigrationError) {
    warn!(kind, key = %key, status = ?error.status(), error = %error, "Failed to submit item");
}

/// Create every epic, then every story with its resolved epic id
pub async fn upload(sink: &dyn ClubhouseSink, migration: &Migration) -> UploadReport {
    let mut report = UploadReport::default();
    let mut created: HashMap<String, i64> = HashMap::with_capacity(migration.epics.len());

    for epic in &migration.epics {
        match sink.submit_epic(&epic.to_request()).await {
            Ok(id) => {
                created.insert(epic.key.clone(), id);
                report.epics_created += 1;
            }
            Err(e) => {
                log_failure("epic", &epic.key, &e);
                report.epics_failed += 1;
            }
        }
    }

    for story in &migration.stories {
        let link = link_epic(story, &created);
        if link == EpicLink::Unresolved {
            warn!(
                story = %story.key,
                epic = ?story.epic_link,
                "Epic was not created, uploading story without it"
            );
            report.unresolved_epic_links += 1;
        }

        match sink.submit_story(&story.to_request(link.id())).await {
            Ok(_) => report.stories_created += 1,
            Err(e) => {
                log_failure("story", &story.key, &e);
                report.stories_failed += 1;
            }
        }
    }

    info!(
        epics_created = report.epics_created,
        epics_failed = report.epics_failed,
        stories_created = report.stories_created,
        stories_failed = report.stories_failed,
        unresolved_epic_links = report.unresolved_epic_links,
        "Upload finished"
    );
    report
}
