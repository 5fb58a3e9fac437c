//! Seams between the migration and the remote workspace
//!
//! `ClubhouseSink` receives created entities during an upload;
//! `ClubhouseWorkspace` exposes the maintenance calls of the cleanup commands.
//! `ClubhouseClient` implements both; `DryRunSink` stands in for test mode.

use super::model::{EpicRequest, EpicSummary, StoryRequest, StorySummary};
use crate::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

/// Destination of an upload. Returns the id the remote assigned.
#[async_trait]
pub trait ClubhouseSink: Send + Sync {
    async fn submit_epic(&self, epic: &EpicRequest) -> Result<i64>;
    async fn submit_story(&self, story: &StoryRequest) -> Result<i64>;
}

/// Listing and deletion calls used for workspace cleanup
#[async_trait]
pub trait ClubhouseWorkspace: Send + Sync {
    async fn epics(&self) -> Result<Vec<EpicSummary>>;
    async fn story_count(&self, epic_id: i64) -> Result<usize>;
    async fn remove_epic(&self, epic_id: i64) -> Result<()>;
    async fn archived_stories(&self) -> Result<Vec<StorySummary>>;
    async fn remove_story(&self, story_id: i64) -> Result<()>;
}

/// Sink that never touches the network; hands out sequential ids
#[derive(Debug, Default)]
pub struct DryRunSink {
    next_id: AtomicI64,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl ClubhouseSink for DryRunSink {
    async fn submit_epic(&self, epic: &EpicRequest) -> Result<i64> {
        let id = self.next();
        tracing::info!(id, name = %epic.name, "[test mode] Would create epic");
        Ok(id)
    }

    async fn submit_story(&self, story: &StoryRequest) -> Result<i64> {
        let id = self.next();
        tracing::info!(
            id,
            name = %story.name,
            epic_id = ?story.epic_id,
            tasks = story.tasks.len(),
            "[test mode] Would create story"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_dry_run_ids_are_sequential() {
        let sink = DryRunSink::new();
        let epic = EpicRequest {
            created_at: Utc::now(),
            description: String::new(),
            name: "Launch".to_string(),
        };

        assert_eq!(sink.submit_epic(&epic).await.unwrap(), 1);
        assert_eq!(sink.submit_epic(&epic).await.unwrap(), 2);
    }
}
