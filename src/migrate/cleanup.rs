//! Workspace cleanup after a migration
//!
//! Trial uploads leave epics without stories and archived stories behind.
//! Both passes keep going past individual failures.

use crate::clubhouse::ClubhouseWorkspace;
use crate::Result;
use tracing::{info, warn};

/// Outcome of a cleanup pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Items that matched the cleanup criterion
    pub matched: u32,
    pub deleted: u32,
    pub failed: u32,
}

/// Delete every epic that has no stories
///
/// Listing the epics is the only fatal step.
pub async fn prune_empty_epics(
    workspace: &dyn ClubhouseWorkspace,
    dry_run: bool,
) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    for epic in workspace.epics().await? {
        let count = match workspace.story_count(epic.id).await {
            Ok(count) => count,
            Err(e) => {
                warn!(id = epic.id, name = %epic.name, error = %e, "Failed to count epic stories");
                report.failed += 1;
                continue;
            }
        };
        if count > 0 {
            continue;
        }

        report.matched += 1;
        if dry_run {
            info!(id = epic.id, name = %epic.name, "[dry run] Would delete empty epic");
            continue;
        }
        match workspace.remove_epic(epic.id).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(id = epic.id, name = %epic.name, error = %e, "Failed to delete epic");
                report.failed += 1;
            }
        }
    }

    info!(
        matched = report.matched,
        deleted = report.deleted,
        failed = report.failed,
        "Empty epic cleanup finished"
    );
    Ok(report)
}

/// Delete every archived story
pub async fn purge_archived_stories(
    workspace: &dyn ClubhouseWorkspace,
    dry_run: bool,
) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    for story in workspace.archived_stories().await? {
        if !story.archived {
            continue;
        }
        report.matched += 1;
        if dry_run {
            info!(id = story.id, name = %story.name, "[dry run] Would delete archived story");
            continue;
        }
        match workspace.remove_story(story.id).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(id = story.id, name = %story.name, error = %e, "Failed to delete story");
                report.failed += 1;
            }
        }
    }

    info!(
        matched = report.matched,
        deleted = report.deleted,
        failed = report.failed,
        "Archived story cleanup finished"
    );
    Ok(report)
}
