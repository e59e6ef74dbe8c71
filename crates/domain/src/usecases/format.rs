//! Formatting use case - turns a content item into a bounded-length post

use std::sync::Arc;

use crate::{
    MAX_POST_CHARS,
    model::{ContentItem, ContentKind},
    ports::TextGenerator,
    random::RandomSource,
    templates::{Brand, TemplateSet, fill_template},
    truncate_with_ellipsis,
};

/// Configuration for the formatter
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Maximum characters in the final post
    pub max_chars: usize,
    /// Brand mentioned in prompts and templates
    pub brand: Brand,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_chars: MAX_POST_CHARS,
            brand: Brand::default(),
        }
    }
}

/// Which path produced a formatted post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatPath {
    Generated,
    Fallback(TemplateSet),
}

/// A post ready for publishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPost {
    pub text: String,
    pub path: FormatPath,
}

/// Formats content via a text generator, with a local template fallback
pub struct TweetFormatter {
    generator: Option<Arc<dyn TextGenerator>>,
    random: Arc<RandomSource>,
    config: FormatConfig,
}

impl TweetFormatter {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        random: Arc<RandomSource>,
        config: FormatConfig,
    ) -> Self {
        Self {
            generator,
            random,
            config,
        }
    }

    /// Format an item, falling back to a template on any generation failure
    pub async fn format(&self, item: &ContentItem) -> FormattedPost {
        if let Some(generator) = &self.generator {
            let prompt = self.build_prompt(item);

            match generator.generate(&prompt).await {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        return FormattedPost {
                            text: truncate_with_ellipsis(text, self.config.max_chars),
                            path: FormatPath::Generated,
                        };
                    }
                    tracing::warn!(
                        provider = generator.provider(),
                        "Generator returned empty text, using template"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        provider = generator.provider(),
                        error = %e,
                        "Generation failed, using template"
                    );
                }
            }
        }

        let (text, set) = self.format_fallback(item);
        FormattedPost {
            text,
            path: FormatPath::Fallback(set),
        }
    }

    /// Build the generation prompt for an item
    pub fn build_prompt(&self, item: &ContentItem) -> String {
        let brand = &self.config.brand;
        let limit = self.config.max_chars;

        match item.kind {
            ContentKind::ProfessionalInsight => format!(
                "Create a Twitter post about this tech insight: {}. Make it engaging, professional, and mention that I built {} (an {}). Include relevant hashtags. Keep it under {} characters. Format with proper line breaks for readability.",
                item.title, brand.name, brand.about, limit
            ),
            ContentKind::News | ContentKind::Discussion => format!(
                "Create a Twitter post about this tech topic: {}. Make it engaging, informative, and professional. Mention that I built {} (an {}). Include relevant hashtags. Keep it under {} characters. Format with proper line breaks for readability.",
                item.title, brand.name, brand.about, limit
            ),
        }
    }

    /// Fill a randomly chosen template from the item's template set
    pub fn format_fallback(&self, item: &ContentItem) -> (String, TemplateSet) {
        let set = TemplateSet::for_kind(item.kind);
        let templates = set.templates();
        let index = self.random.pick_index(templates.len()).unwrap_or(0);

        let text = fill_template(templates[index], &item.title, &self.config.brand);

        (truncate_with_ellipsis(&text, self.config.max_chars), set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GenerateError;
    use async_trait::async_trait;
    use time::OffsetDateTime;

    struct FakeGenerator {
        result: Result<String, u16>,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            match &self.result {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(GenerateError::Api(format!("API returned {}", status))),
            }
        }

        fn provider(&self) -> &'static str {
            "fake"
        }
    }

    fn item(title: &str, kind: ContentKind) -> ContentItem {
        ContentItem::new(title, "test", kind, OffsetDateTime::now_utc()).unwrap()
    }

    fn formatter(generator: Option<FakeGenerator>, seed: u64) -> TweetFormatter {
        TweetFormatter::new(
            generator.map(|g| Arc::new(g) as Arc<dyn TextGenerator>),
            Arc::new(RandomSource::seeded(seed)),
            FormatConfig::default(),
        )
    }

    fn filled_set(set: TemplateSet, title: &str) -> Vec<String> {
        set.templates()
            .iter()
            .map(|t| fill_template(t, title, &Brand::default()))
            .collect()
    }

    #[tokio::test]
    async fn test_generated_text_used_verbatim() {
        let formatter = formatter(
            Some(FakeGenerator {
                result: Ok("  Generated post #Tech  \n".to_string()),
            }),
            1,
        );

        let post = formatter.format(&item("Rust 2.0", ContentKind::News)).await;

        assert_eq!(post.text, "Generated post #Tech");
        assert_eq!(post.path, FormatPath::Generated);
    }

    #[tokio::test]
    async fn test_generated_text_truncated_to_limit() {
        let formatter = formatter(
            Some(FakeGenerator {
                result: Ok("x".repeat(290)),
            }),
            1,
        );

        let post = formatter.format(&item("Long", ContentKind::News)).await;

        assert_eq!(post.text.chars().count(), 280);
        assert!(post.text.ends_with("..."));
    }

    #[tokio::test]
    async fn test_generation_error_falls_back_to_generic_template() {
        let formatter = formatter(Some(FakeGenerator { result: Err(500) }), 11);

        let post = formatter.format(&item("X", ContentKind::News)).await;

        assert_eq!(post.path, FormatPath::Fallback(TemplateSet::Generic));
        assert!(filled_set(TemplateSet::Generic, "X").contains(&post.text));
        assert!(post.text.chars().count() <= 280);
    }

    #[tokio::test]
    async fn test_empty_generation_falls_back() {
        let formatter = formatter(
            Some(FakeGenerator {
                result: Ok("   ".to_string()),
            }),
            2,
        );

        let post = formatter
            .format(&item("Thread", ContentKind::Discussion))
            .await;

        assert_eq!(post.path, FormatPath::Fallback(TemplateSet::Generic));
    }

    #[tokio::test]
    async fn test_no_generator_uses_fallback() {
        let formatter = formatter(None, 3);

        let post = formatter.format(&item("Story", ContentKind::News)).await;

        assert!(matches!(post.path, FormatPath::Fallback(_)));
    }

    #[test]
    fn test_insight_fallback_uses_insight_templates_only() {
        let formatter = formatter(None, 5);
        let insight = item("ship small, ship often", ContentKind::ProfessionalInsight);
        let insight_texts = filled_set(TemplateSet::Insight, &insight.title);
        let generic_texts = filled_set(TemplateSet::Generic, &insight.title);

        for _ in 0..50 {
            let (text, set) = formatter.format_fallback(&insight);
            assert_eq!(set, TemplateSet::Insight);
            assert!(insight_texts.contains(&text));
            assert!(!generic_texts.contains(&text));
        }
    }

    #[test]
    fn test_news_fallback_never_uses_insight_templates() {
        let formatter = formatter(None, 6);
        let news = item("New database released", ContentKind::News);
        let insight_texts = filled_set(TemplateSet::Insight, &news.title);

        for _ in 0..50 {
            let (text, set) = formatter.format_fallback(&news);
            assert_eq!(set, TemplateSet::Generic);
            assert!(!insight_texts.contains(&text));
        }
    }

    #[test]
    fn test_fallback_truncates_long_titles() {
        let formatter = formatter(None, 8);
        let long = item(&"word ".repeat(100), ContentKind::ProfessionalInsight);

        let (text, _) = formatter.format_fallback(&long);

        assert_eq!(text.chars().count(), 280);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_prompt_mentions_title_and_kind() {
        let formatter = formatter(None, 1);

        let insight_prompt =
            formatter.build_prompt(&item("Hire slowly", ContentKind::ProfessionalInsight));
        let news_prompt = formatter.build_prompt(&item("Rust 2.0", ContentKind::News));

        assert!(insight_prompt.contains("tech insight: Hire slowly"));
        assert!(news_prompt.contains("tech topic: Rust 2.0"));
        assert!(news_prompt.contains("Nexoxa"));
        assert!(news_prompt.contains("under 280 characters"));
    }
}
