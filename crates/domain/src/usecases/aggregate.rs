//! Content aggregation use case - gathers items from every configured source

use std::sync::Arc;

use crate::{model::ContentItem, ports::ContentSource};

/// Collects content from all sources into one flat list
#[derive(Clone)]
pub struct ContentAggregator {
    sources: Vec<Arc<dyn ContentSource>>,
}

impl ContentAggregator {
    pub fn new(sources: Vec<Arc<dyn ContentSource>>) -> Self {
        Self { sources }
    }

    /// Number of configured sources
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Fetch every source in order and concatenate the results.
    ///
    /// A failing source contributes nothing; an empty result means no
    /// content is available this cycle.
    pub async fn aggregate(&self) -> Vec<ContentItem> {
        let mut items = Vec::new();

        for source in &self.sources {
            match source.fetch().await {
                Ok(fetched) => {
                    let fetched_count = fetched.len();
                    let valid: Vec<_> = fetched
                        .into_iter()
                        .filter(|item| !item.title.trim().is_empty())
                        .collect();

                    if valid.len() < fetched_count {
                        tracing::warn!(
                            source = %source.name(),
                            dropped = fetched_count - valid.len(),
                            "Dropped items without a title"
                        );
                    }

                    tracing::info!(source = %source.name(), count = valid.len(), "Fetched content");
                    items.extend(valid);
                }
                Err(e) => {
                    tracing::warn!(source = %source.name(), error = %e, "Content source unavailable");
                }
            }
        }

        tracing::info!(count = items.len(), "Aggregated content from all sources");

        items
    }
}
