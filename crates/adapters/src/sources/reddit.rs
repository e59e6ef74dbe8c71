//! Reddit hot posts for one subreddit

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use trend_poster_domain::{Clock, ContentItem, ContentKind, ContentSource, SourceError};

use super::{SourceConfig, check_status};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Reads hot posts from a subreddit's JSON listing
pub struct RedditSource {
    client: Client,
    base_url: String,
    subreddit: String,
    source_name: String,
    limit: usize,
    clock: Arc<dyn Clock>,
}

impl RedditSource {
    pub fn new(subreddit: String, config: SourceConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_base_url(
            "https://www.reddit.com".to_string(),
            subreddit,
            None,
            config,
            clock,
        )
    }

    pub fn with_base_url(
        base_url: String,
        subreddit: String,
        user_agent: Option<String>,
        config: SourceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            source_name: format!("Reddit r/{}", subreddit),
            subreddit,
            limit: config.limit,
            clock,
        }
    }
}

#[derive(Deserialize)]
struct Listing {
    data: Option<ListingData>,
}

#[derive(Deserialize)]
struct ListingData {
    children: Option<Vec<Child>>,
}

#[derive(Deserialize)]
struct Child {
    data: Option<PostData>,
}

#[derive(Deserialize)]
struct PostData {
    title: Option<String>,
    permalink: Option<String>,
    score: Option<i64>,
}

#[async_trait]
impl ContentSource for RedditSource {
    async fn fetch(&self) -> Result<Vec<ContentItem>, SourceError> {
        let url = format!("{}/r/{}/hot.json", self.base_url, self.subreddit);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Network("request timed out".to_string())
            } else {
                SourceError::Network(e.to_string())
            }
        })?;
        let response = check_status(response)?;

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if body.trim().is_empty() {
            return Err(SourceError::EmptyBody);
        }

        let listing: Listing = serde_json::from_str(&body)
            .map_err(|e| SourceError::Malformed(format!("Invalid JSON: {}", e)))?;

        let children = listing
            .data
            .and_then(|data| data.children)
            .ok_or_else(|| SourceError::Malformed("Unexpected listing structure".to_string()))?;

        let items = children
            .into_iter()
            .filter_map(|child| child.data)
            .filter_map(|post| {
                let permalink = post.permalink.unwrap_or_default();
                ContentItem::new(
                    post.title?,
                    self.source_name.clone(),
                    ContentKind::Discussion,
                    self.clock.now(),
                )
                .map(|item| {
                    item.with_url(Some(format!("https://reddit.com{}", permalink)))
                        .with_score(post.score)
                })
            })
            .take(self.limit)
            .collect();

        Ok(items)
    }

    fn name(&self) -> &str {
        &self.source_name
    }
}
