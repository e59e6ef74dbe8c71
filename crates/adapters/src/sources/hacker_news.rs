//! Hacker News top stories via the Firebase API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use trend_poster_domain::{Clock, ContentItem, ContentKind, ContentSource, SourceError};

use super::{SourceConfig, check_status};

const SOURCE_NAME: &str = "Hacker News";

/// Reads the current top stories
pub struct HackerNewsSource {
    client: Client,
    base_url: String,
    limit: usize,
    clock: Arc<dyn Clock>,
}

impl HackerNewsSource {
    pub fn new(config: SourceConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_base_url(
            "https://hacker-news.firebaseio.com".to_string(),
            config,
            clock,
        )
    }

    pub fn with_base_url(base_url: String, config: SourceConfig, clock: Arc<dyn Clock>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
            clock,
        }
    }

    async fn top_story_ids(&self) -> Result<Vec<u64>, SourceError> {
        let url = format!("{}/v0/topstories.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let response = check_status(response)?;

        let ids: Option<Vec<u64>> = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        ids.ok_or(SourceError::EmptyBody)
    }

    async fn story(&self, id: u64) -> Result<Option<HnItem>, SourceError> {
        let url = format!("{}/v0/item/{}.json", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let response = check_status(response)?;

        response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

#[derive(Deserialize)]
struct HnItem {
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    url: Option<String>,
    score: Option<i64>,
}

#[async_trait]
impl ContentSource for HackerNewsSource {
    async fn fetch(&self) -> Result<Vec<ContentItem>, SourceError> {
        let ids = self.top_story_ids().await?;
        let mut items = Vec::new();

        for id in ids.into_iter().take(self.limit) {
            let story = match self.story(id).await {
                Ok(Some(story)) => story,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(story_id = id, error = %e, "Skipping story");
                    continue;
                }
            };

            if story.kind.as_deref() != Some("story") {
                continue;
            }

            let Some(item) = story.title.and_then(|title| {
                ContentItem::new(title, SOURCE_NAME, ContentKind::News, self.clock.now())
            }) else {
                continue;
            };

            items.push(item.with_url(story.url).with_score(story.score));
        }

        Ok(items)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}
