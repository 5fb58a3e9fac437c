//! Clubhouse REST adapter
//!
//! Thin wrapper over the v3 API: creation calls used by the upload and the
//! list/delete calls used by the cleanup commands. Every non-2xx response
//! becomes `MigrationError::Api` with the status and body.

use super::model::{
    CreatedEntity, EpicRequest, EpicSummary, StoryRequest, StorySummary,
};
use super::sink::{ClubhouseSink, ClubhouseWorkspace};
use crate::config::ClubhouseSettings;
use crate::{MigrationError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Header carrying the API token
const TOKEN_HEADER: &str = "Clubhouse-Token";

/// Clubhouse API client
pub struct ClubhouseClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct StorySearch {
    archived: bool,
}

impl ClubhouseClient {
    /// Create a new client
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &ClubhouseSettings, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.header(TOKEN_HEADER, &self.token).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MigrationError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    pub async fn create_epic(&self, epic: &EpicRequest) -> Result<CreatedEntity> {
        debug!(name = %epic.name, "Creating Clubhouse epic");
        let response = self
            .send(self.client.post(self.url("epics")).json(epic))
            .await?;
        let created: CreatedEntity = response.json().await?;
        info!(id = created.id, name = %epic.name, "Created Clubhouse epic");
        Ok(created)
    }

    pub async fn create_story(&self, story: &StoryRequest) -> Result<CreatedEntity> {
        debug!(name = %story.name, epic_id = ?story.epic_id, "Creating Clubhouse story");
        let response = self
            .send(self.client.post(self.url("stories")).json(story))
            .await?;
        let created: CreatedEntity = response.json().await?;
        info!(id = created.id, name = %story.name, "Created Clubhouse story");
        Ok(created)
    }

    pub async fn list_epics(&self) -> Result<Vec<EpicSummary>> {
        let response = self.send(self.client.get(self.url("epics"))).await?;
        let epics: Vec<EpicSummary> = response.json().await?;
        debug!(count = epics.len(), "Listed Clubhouse epics");
        Ok(epics)
    }

    pub async fn epic_stories(&self, epic_id: i64) -> Result<Vec<StorySummary>> {
        let response = self
            .send(self.client.get(self.url(&format!("epics/{}/stories", epic_id))))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn delete_epic(&self, epic_id: i64) -> Result<()> {
        self.send(self.client.delete(self.url(&format!("epics/{}", epic_id))))
            .await?;
        info!(id = epic_id, "Deleted Clubhouse epic");
        Ok(())
    }

    pub async fn search_archived_stories(&self) -> Result<Vec<StorySummary>> {
        let response = self
            .send(
                self.client
                    .post(self.url("stories/search"))
                    .json(&StorySearch { archived: true }),
            )
            .await?;
        let stories: Vec<StorySummary> = response.json().await?;
        debug!(count = stories.len(), "Found archived stories");
        Ok(stories)
    }

    pub async fn delete_story(&self, story_id: i64) -> Result<()> {
        self.send(self.client.delete(self.url(&format!("stories/{}", story_id))))
            .await?;
        info!(id = story_id, "Deleted Clubhouse story");
        Ok(())
    }
}

#[async_trait]
impl ClubhouseSink for ClubhouseClient {
    async fn submit_epic(&self, epic: &EpicRequest) -> Result<i64> {
        Ok(self.create_epic(epic).await?.id)
    }

    async fn submit_story(&self, story: &StoryRequest) -> Result<i64> {
        Ok(self.create_story(story).await?.id)
    }
}

#[async_trait]
impl ClubhouseWorkspace for ClubhouseClient {
    async fn epics(&self) -> Result<Vec<EpicSummary>> {
        self.list_epics().await
    }

    async fn story_count(&self, epic_id: i64) -> Result<usize> {
        Ok(self.epic_stories(epic_id).await?.len())
    }

    async fn remove_epic(&self, epic_id: i64) -> Result<()> {
        self.delete_epic(epic_id).await
    }

    async fn archived_stories(&self) -> Result<Vec<StorySummary>> {
        self.search_archived_stories().await
    }

    async fn remove_story(&self, story_id: i64) -> Result<()> {
        self.delete_story(story_id).await
    }
}
