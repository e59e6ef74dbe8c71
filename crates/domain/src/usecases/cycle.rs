//! Posting cycle use case - aggregate, pick, format, delay, post

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    model::CycleOutcome,
    ports::{MediaFetcher, PublishError},
    random::RandomSource,
    usecases::{aggregate::ContentAggregator, format::TweetFormatter, publish::PostPublisher},
};

/// Configuration for one posting cycle
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Probability of attempting to attach media
    pub media_probability: f64,
    /// Lower bound of the pre-post delay
    pub min_delay: Duration,
    /// Upper bound of the pre-post delay
    pub max_delay: Duration,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            media_probability: 0.3,
            min_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(120),
        }
    }
}

/// Errors that end a cycle unsuccessfully
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Posting failed: {0}")]
    Post(#[from] PublishError),
}

/// Anything the scheduler can run as a cycle
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_cycle(&self) -> Result<CycleOutcome, CycleError>;
}

/// One full pass of the posting pipeline
pub struct PostingCycle {
    aggregator: ContentAggregator,
    formatter: TweetFormatter,
    media_fetcher: Option<Arc<dyn MediaFetcher>>,
    publisher: PostPublisher,
    random: Arc<RandomSource>,
    config: CycleConfig,
}

impl PostingCycle {
    pub fn new(
        aggregator: ContentAggregator,
        formatter: TweetFormatter,
        media_fetcher: Option<Arc<dyn MediaFetcher>>,
        publisher: PostPublisher,
        random: Arc<RandomSource>,
        config: CycleConfig,
    ) -> Self {
        Self {
            aggregator,
            formatter,
            media_fetcher,
            publisher,
            random,
            config,
        }
    }

    /// Run the pipeline once
    pub async fn run_once(&self) -> Result<CycleOutcome, CycleError> {
        tracing::info!("Starting posting cycle");

        let items = self.aggregator.aggregate().await;

        let Some(index) = self.random.pick_index(items.len()) else {
            tracing::warn!("No content found, skipping this cycle");
            return Ok(CycleOutcome::Skipped {
                reason: "No content available".to_string(),
            });
        };
        let item = &items[index];

        let include_media =
            self.media_fetcher.is_some() && self.random.chance(self.config.media_probability);

        tracing::info!(
            title = %item.short_title(),
            source = %item.source,
            kind = %item.kind,
            include_media = include_media,
            "Selected content"
        );

        let formatted = self.formatter.format(item).await;
        tracing::debug!(text = %formatted.text, path = ?formatted.path, "Formatted post");

        let delay = self
            .random
            .duration_between(self.config.min_delay, self.config.max_delay);
        if !delay.is_zero() {
            tracing::info!(delay_secs = delay.as_secs_f64(), "Waiting before posting");
            tokio::time::sleep(delay).await;
        }

        let media = match (&self.media_fetcher, include_media) {
            (Some(fetcher), true) => match fetcher.fetch_media().await {
                Ok(media) => Some(media),
                Err(e) => {
                    tracing::warn!(error = %e, "Media unavailable, posting without image");
                    None
                }
            },
            _ => None,
        };

        match self.publisher.publish(&formatted.text, media).await {
            Ok(receipt) => {
                tracing::info!(
                    post_id = %receipt.id,
                    with_media = receipt.with_media,
                    platform = self.publisher.platform(),
                    title = %item.short_title(),
                    source = %item.source,
                    "Post published"
                );
                Ok(CycleOutcome::Posted {
                    receipt,
                    title: item.title.clone(),
                    source: item.source.clone(),
                })
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    title = %item.short_title(),
                    source = %item.source,
                    "Failed to publish post"
                );
                Err(CycleError::Post(e))
            }
        }
    }
}

#[async_trait]
impl CycleRunner for PostingCycle {
    async fn run_cycle(&self) -> Result<CycleOutcome, CycleError> {
        self.run_once().await
    }
}
