//! Content source adapters

mod hacker_news;
mod insights;
mod reddit;
mod rss;

pub use hacker_news::HackerNewsSource;
pub use insights::{DEFAULT_INSIGHTS, StaticInsightsSource};
pub use reddit::RedditSource;
pub use rss::RssFeedSource;

use reqwest::Response;
use trend_poster_domain::SourceError;

/// Settings shared by the network-backed sources
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Maximum items kept per fetch
    pub limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            timeout_secs: 10,
        }
    }
}

fn check_status(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response)
}
