//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use time::OffsetDateTime;

/// Kind of content an item carries; formatting branches on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Headline from a news source
    News,
    /// Thread from a discussion forum
    Discussion,
    /// Pre-authored insight from the static pool
    ProfessionalInsight,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::News => "news",
            ContentKind::Discussion => "discussion",
            ContentKind::ProfessionalInsight => "professional_insight",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single piece of gathered content, built fresh on every aggregation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Headline or insight text (never empty)
    pub title: String,
    /// Link to the original content, if any
    pub url: Option<String>,
    /// Human-readable source name (e.g., "Hacker News")
    pub source: String,
    /// When the item was gathered
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Content kind
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Source-specific popularity score
    pub score: Option<i64>,
}

impl ContentItem {
    /// Build an item, returning `None` when the title is blank
    pub fn new(
        title: impl Into<String>,
        source: impl Into<String>,
        kind: ContentKind,
        timestamp: OffsetDateTime,
    ) -> Option<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return None;
        }

        Some(Self {
            title,
            url: None,
            source: source.into(),
            timestamp,
            kind,
            score: None,
        })
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_score(mut self, score: Option<i64>) -> Self {
        self.score = score;
        self
    }

    /// Title shortened for log lines
    pub fn short_title(&self) -> String {
        self.title.chars().take(100).collect()
    }
}

/// Reference to a scratch image prepared for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    /// Location of the encoded image on local storage
    pub path: PathBuf,
    /// Encoded size in bytes
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
}

/// Receipt for a successfully created post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    /// Platform-specific post ID
    pub id: String,
    /// URL to the published post, if available
    pub url: Option<String>,
    /// Whether the post carries an attached image
    pub with_media: bool,
}

/// Result of one posting cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Nothing was posted this cycle
    Skipped { reason: String },
    /// A post was created
    Posted {
        receipt: PostReceipt,
        title: String,
        source: String,
    },
}
