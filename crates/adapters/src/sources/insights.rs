//! Static pool of pre-authored insights

use async_trait::async_trait;
use std::sync::Arc;
use trend_poster_domain::{Clock, ContentItem, ContentKind, ContentSource, SourceError};

/// Built-in insight pool used when none is configured
pub const DEFAULT_INSIGHTS: [&str; 11] = [
    "get a status page\nget a professional email\nget a terms of service/privacy/policy\nget a help center\nget a blog\nget a support twitter account\n\nyou instantly go from being another startup/saas to a real company",
    "wait fuck, i don't have a browser\n\nim setting up this new pc\n\nfirst thing i do, i uninstall microsoft edge\n\nthen i realize\n\ni don't have any other browser\n\nso now i can't get a browser\n\ni cant install a browser without a browser\n\nplease help",
    "Revamped an old TV into a sleek, vintage-inspired gift—combining nostalgia with modern tech! 🚀💡 Proud to have built Nexoxa, pushing boundaries in creative tech solutions. Who else loves giving new life to old devices? #TechRevamp #DIY #Innovation #Nexoxa #Gifts #TechTips",
    "Building Nexoxa taught me: the best way to learn programming is to build something you actually want to use",
    "Nexoxa is an AI content sharing platform that revolutionizes how creators share and discover content. Most startups fail not because of bad code, but because of bad product-market fit",
    "The hardest part of building Nexoxa wasn't the technical challenges, it's the people problems",
    "Every successful tech company like Nexoxa started with someone solving their own problem",
    "The best developers aren't the ones who know every language, they're the ones who can learn any language - learned this building Nexoxa",
    "Code reviews aren't about finding bugs, they're about knowledge sharing and team growth - essential for Nexoxa's success",
    "Building Nexoxa taught me: the most important skill in tech isn't coding, it's communication",
    "Creating Nexoxa showed me: building a startup is 10% coding and 90% everything else",
];

/// Returns every configured insight; never touches the network
pub struct StaticInsightsSource {
    insights: Vec<String>,
    source_name: String,
    clock: Arc<dyn Clock>,
}

impl StaticInsightsSource {
    pub fn new(insights: Vec<String>, source_name: String, clock: Arc<dyn Clock>) -> Self {
        Self {
            insights,
            source_name,
            clock,
        }
    }

    /// Source backed by [`DEFAULT_INSIGHTS`]
    pub fn with_defaults(source_name: String, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            DEFAULT_INSIGHTS.iter().map(|s| s.to_string()).collect(),
            source_name,
            clock,
        )
    }
}

#[async_trait]
impl ContentSource for StaticInsightsSource {
    async fn fetch(&self) -> Result<Vec<ContentItem>, SourceError> {
        let now = self.clock.now();

        Ok(self
            .insights
            .iter()
            .filter_map(|insight| {
                ContentItem::new(
                    insight.as_str(),
                    self.source_name.clone(),
                    ContentKind::ProfessionalInsight,
                    now,
                )
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.source_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use trend_poster_domain::SystemClock;

    struct FixedClock(OffsetDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> OffsetDateTime {
            self.0
        }
    }

    #[tokio::test]
    async fn test_default_pool_yields_every_insight() {
        let source =
            StaticInsightsSource::with_defaults("Nexoxa Insights".to_string(), Arc::new(SystemClock));

        let items = source.fetch().await.unwrap();

        assert_eq!(items.len(), DEFAULT_INSIGHTS.len());
        assert!(
            items
                .iter()
                .all(|i| i.kind == ContentKind::ProfessionalInsight && !i.title.is_empty())
        );
        assert!(items.iter().all(|i| i.url.is_none()));
    }

    #[tokio::test]
    async fn test_default_pool_keeps_authored_text() {
        let source =
            StaticInsightsSource::with_defaults("Nexoxa Insights".to_string(), Arc::new(SystemClock));

        let items = source.fetch().await.unwrap();

        assert!(items[1].title.starts_with("wait fuck, i don't have a browser\n\n"));
        assert!(items[2].title.contains("vintage-inspired gift—combining nostalgia"));
        assert!(items[0].title.ends_with("a real company"));
    }

    #[tokio::test]
    async fn test_blank_entries_skipped() {
        let fixed = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let source = StaticInsightsSource::new(
            vec!["ship it".to_string(), "  ".to_string()],
            "Insights".to_string(),
            Arc::new(FixedClock(fixed)),
        );

        let items = source.fetch().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].timestamp, fixed);
        assert_eq!(items[0].source, "Insights");
    }
}
