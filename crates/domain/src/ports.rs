//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{ContentItem, MediaRef, PostReceipt};

/// Error type for content source operations
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Source returned status {status}")]
    Status { status: u16 },
    #[error("Empty response body")]
    EmptyBody,
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Port for fetching content from one external source
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch and normalize the source's current items
    async fn fetch(&self) -> Result<Vec<ContentItem>, SourceError>;

    /// Source name used in logs
    fn name(&self) -> &str;
}

/// Error type for text generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Generation API error: {0}")]
    Api(String),
    #[error("Empty generation")]
    Empty,
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
}

/// Port for an external text-generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a natural-language prompt
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Provider name used in logs
    fn provider(&self) -> &'static str;
}

/// Error type for media fetching
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media fetching not configured: {0}")]
    NotConfigured(String),
    #[error("Image search failed: {0}")]
    Search(String),
    #[error("Image download failed: {0}")]
    Download(String),
    #[error("Image processing failed: {0}")]
    Processing(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for retrieving an image ready for upload
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch a photo and write it to scratch storage
    async fn fetch_media(&self) -> Result<MediaRef, MediaError>;
}

/// Error type for posting operations
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Content too long: {len} > {max}")]
    ContentTooLong { len: usize, max: usize },
    #[error("Media upload failed: {0}")]
    Media(String),
}

/// Port for the social-media posting API
#[async_trait]
pub trait SocialPoster: Send + Sync {
    /// Upload an image, returning the platform media ID
    async fn upload_media(&self, media: &MediaRef) -> Result<String, PublishError>;

    /// Create a post with optional attached media IDs
    async fn create_post(
        &self,
        text: &str,
        media_ids: &[String],
    ) -> Result<PostReceipt, PublishError>;

    /// Get the platform name (e.g., "x", "outbox")
    fn platform(&self) -> &'static str;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
