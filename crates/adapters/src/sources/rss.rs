//! RSS/Atom feed source

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use trend_poster_domain::{Clock, ContentItem, ContentKind, ContentSource, SourceError};

use super::{SourceConfig, check_status};

/// Latest entries of a single feed
pub struct RssFeedSource {
    client: Client,
    feed_url: String,
    source_name: String,
    limit: usize,
    clock: Arc<dyn Clock>,
}

impl RssFeedSource {
    pub fn new(
        feed_url: String,
        source_name: String,
        config: SourceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            feed_url,
            source_name,
            limit: config.limit,
            clock,
        }
    }

    fn parse(&self, body: &[u8]) -> Result<Vec<ContentItem>, SourceError> {
        let feed = parser::parse(body)
            .map_err(|e| SourceError::Malformed(format!("Failed to parse feed: {}", e)))?;

        let items = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let title = entry.title.map(|t| t.content)?;
                let url = entry.links.first().map(|link| link.href.clone());
                ContentItem::new(
                    title,
                    self.source_name.clone(),
                    ContentKind::News,
                    self.clock.now(),
                )
                .map(|item| item.with_url(url))
            })
            .take(self.limit)
            .collect();

        Ok(items)
    }
}

#[async_trait]
impl ContentSource for RssFeedSource {
    async fn fetch(&self) -> Result<Vec<ContentItem>, SourceError> {
        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let response = check_status(response)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(SourceError::EmptyBody);
        }

        self.parse(&body)
    }

    fn name(&self) -> &str {
        &self.source_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trend_poster_domain::SystemClock;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>TechCrunch</title>
    <link>https://techcrunch.com</link>
    <description>Startup and technology news</description>
    <item>
      <title>Startup raises seed round</title>
      <link>https://techcrunch.com/2024/01/01/seed-round/</link>
      <description>Summary one</description>
    </item>
    <item>
      <title>New chip announced</title>
      <link>https://techcrunch.com/2024/01/02/new-chip/</link>
    </item>
    <item>
      <title></title>
      <link>https://techcrunch.com/2024/01/03/untitled/</link>
    </item>
    <item>
      <title>Third story</title>
      <link>https://techcrunch.com/2024/01/04/third/</link>
    </item>
  </channel>
</rss>"#;

    fn source(server: &MockServer, limit: usize) -> RssFeedSource {
        RssFeedSource::new(
            format!("{}/feed/", server.uri()),
            "TechCrunch".to_string(),
            SourceConfig {
                limit,
                timeout_secs: 5,
            },
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn test_fetch_parses_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let items = source(&server, 5).fetch().await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Startup raises seed round");
        assert_eq!(
            items[0].url.as_deref(),
            Some("https://techcrunch.com/2024/01/01/seed-round/")
        );
        assert_eq!(items[0].source, "TechCrunch");
        assert!(items.iter().all(|i| i.kind == ContentKind::News));
    }

    #[tokio::test]
    async fn test_fetch_caps_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let items = source(&server, 2).fetch().await.unwrap();

        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_body_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
            .mount(&server)
            .await;

        let result = source(&server, 5).fetch().await;

        assert!(matches!(result, Err(SourceError::EmptyBody)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not a feed at all"))
            .mount(&server)
            .await;

        let result = source(&server, 5).fetch().await;

        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }
}
