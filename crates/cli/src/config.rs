//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub schedule: ScheduleSettings,

    #[serde(default)]
    pub format: FormatSettings,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub x: XConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default)]
    pub dry_run: bool,

    /// Fixed RNG seed for reproducible selection
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSettings {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_min_delay")]
    pub min_delay_secs: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,

    #[serde(default = "default_media_probability")]
    pub media_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatSettings {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default)]
    pub brand: BrandConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    #[serde(default = "default_brand_name")]
    pub name: String,

    #[serde(default = "default_brand_about")]
    pub about: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub hacker_news: HackerNewsConfig,

    #[serde(default)]
    pub rss: RssConfig,

    #[serde(default)]
    pub reddit: RedditConfig,

    #[serde(default)]
    pub insights: InsightsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackerNewsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_hn_base_url")]
    pub base_url: String,

    #[serde(default = "default_hn_limit")]
    pub limit: usize,

    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_rss_url")]
    pub url: String,

    #[serde(default = "default_rss_name")]
    pub name: String,

    #[serde(default = "default_small_limit")]
    pub limit: usize,

    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_reddit_base_url")]
    pub base_url: String,

    #[serde(default = "default_subreddit")]
    pub subreddit: String,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default = "default_small_limit")]
    pub limit: usize,

    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_insights_name")]
    pub name: String,

    /// Replaces the built-in pool when non-empty
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// pollinations, ollama, openai, stub, none
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_generator_retries")]
    pub retries: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default)]
    pub pollinations: PollinationsConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub stub: StubConfig,
}

/// Canned generator output for offline runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StubConfig {
    /// Without a reply every generation fails and templates are used
    #[serde(default)]
    pub reply: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollinationsConfig {
    #[serde(default = "default_pollinations_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    #[serde(default = "default_ollama_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_openai_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_unsplash_key_env")]
    pub access_key_env: String,

    #[serde(default = "default_unsplash_base_url")]
    pub base_url: String,

    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    #[serde(default = "default_max_width")]
    pub max_width: u32,

    #[serde(default = "default_max_height")]
    pub max_height: u32,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Defaults to the OS temp dir
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    #[serde(default = "default_media_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XConfig {
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_api_secret_env")]
    pub api_secret_env: String,

    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,

    #[serde(default = "default_access_token_secret_env")]
    pub access_token_secret_env: String,

    #[serde(default = "default_x_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_x_upload_base_url")]
    pub upload_base_url: String,

    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_x_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    7200
}

fn default_poll_interval() -> u64 {
    60
}

fn default_min_delay() -> u64 {
    30
}

fn default_max_delay() -> u64 {
    120
}

fn default_media_probability() -> f64 {
    0.3
}

fn default_max_chars() -> usize {
    280
}

fn default_brand_name() -> String {
    "Nexoxa".to_string()
}

fn default_brand_about() -> String {
    "AI content sharing platform".to_string()
}

fn default_hn_base_url() -> String {
    "https://hacker-news.firebaseio.com".to_string()
}

fn default_hn_limit() -> usize {
    10
}

fn default_small_limit() -> usize {
    5
}

fn default_source_timeout() -> u64 {
    10
}

fn default_rss_url() -> String {
    "https://techcrunch.com/feed/".to_string()
}

fn default_rss_name() -> String {
    "TechCrunch".to_string()
}

fn default_reddit_base_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_subreddit() -> String {
    "programming".to_string()
}

fn default_insights_name() -> String {
    "Nexoxa Insights".to_string()
}

fn default_provider() -> String {
    "pollinations".to_string()
}

fn default_generator_timeout() -> u64 {
    30
}

fn default_generator_retries() -> u32 {
    1
}

fn default_temperature() -> f64 {
    0.8
}

fn default_max_output_tokens() -> u32 {
    200
}

fn default_pollinations_base_url() -> String {
    "https://text.pollinations.ai".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_unsplash_key_env() -> String {
    "UNSPLASH_ACCESS_KEY".to_string()
}

fn default_unsplash_base_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_keywords() -> Vec<String> {
    trend_poster_adapters::media::DEFAULT_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_max_width() -> u32 {
    1200
}

fn default_max_height() -> u32 {
    675
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_media_timeout() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "TWITTER_API_KEY".to_string()
}

fn default_api_secret_env() -> String {
    "TWITTER_API_SECRET".to_string()
}

fn default_access_token_env() -> String {
    "TWITTER_ACCESS_TOKEN".to_string()
}

fn default_access_token_secret_env() -> String {
    "TWITTER_ACCESS_TOKEN_SECRET".to_string()
}

fn default_x_api_base_url() -> String {
    "https://api.twitter.com".to_string()
}

fn default_x_upload_base_url() -> String {
    "https://upload.twitter.com".to_string()
}

fn default_x_timeout() -> u64 {
    30
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            dry_run: false,
            seed: None,
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            poll_interval_secs: default_poll_interval(),
            min_delay_secs: default_min_delay(),
            max_delay_secs: default_max_delay(),
            media_probability: default_media_probability(),
        }
    }
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            brand: BrandConfig::default(),
        }
    }
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: default_brand_name(),
            about: default_brand_about(),
        }
    }
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_hn_base_url(),
            limit: default_hn_limit(),
            timeout_secs: default_source_timeout(),
        }
    }
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_rss_url(),
            name: default_rss_name(),
            limit: default_small_limit(),
            timeout_secs: default_source_timeout(),
        }
    }
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_reddit_base_url(),
            subreddit: default_subreddit(),
            user_agent: None,
            limit: default_small_limit(),
            timeout_secs: default_source_timeout(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: default_insights_name(),
            items: vec![],
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            timeout_secs: default_generator_timeout(),
            retries: default_generator_retries(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            pollinations: PollinationsConfig::default(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
            stub: StubConfig::default(),
        }
    }
}

impl Default for PollinationsConfig {
    fn default() -> Self {
        Self {
            base_url: default_pollinations_base_url(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_api_key_env(),
            base_url: default_openai_base_url(),
            model: default_openai_model(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            access_key_env: default_unsplash_key_env(),
            base_url: default_unsplash_base_url(),
            keywords: default_keywords(),
            max_width: default_max_width(),
            max_height: default_max_height(),
            jpeg_quality: default_jpeg_quality(),
            max_bytes: default_max_bytes(),
            scratch_dir: None,
            timeout_secs: default_media_timeout(),
        }
    }
}

impl Default for XConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_secret_env: default_api_secret_env(),
            access_token_env: default_access_token_env(),
            access_token_secret_env: default_access_token_secret_env(),
            api_base_url: default_x_api_base_url(),
            upload_base_url: default_x_upload_base_url(),
            max_chars: default_max_chars(),
            timeout_secs: default_x_timeout(),
        }
    }
}

/// Upper bound for every schedule duration (30 days)
const MAX_SCHEDULE_SECS: u64 = 30 * 24 * 60 * 60;

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        builder = builder.add_source(
            config::Environment::with_prefix("TREND_POSTER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no component can run with
    pub fn validate(&self) -> Result<()> {
        if self.schedule.min_delay_secs > self.schedule.max_delay_secs {
            anyhow::bail!(
                "schedule.min_delay_secs ({}) exceeds schedule.max_delay_secs ({})",
                self.schedule.min_delay_secs,
                self.schedule.max_delay_secs
            );
        }

        if !(0.0..=1.0).contains(&self.schedule.media_probability) {
            anyhow::bail!(
                "schedule.media_probability must be within 0.0..=1.0, got {}",
                self.schedule.media_probability
            );
        }

        if self.schedule.interval_secs == 0 || self.schedule.poll_interval_secs == 0 {
            anyhow::bail!("schedule intervals must be greater than zero");
        }

        for (name, secs) in [
            ("interval_secs", self.schedule.interval_secs),
            ("poll_interval_secs", self.schedule.poll_interval_secs),
            ("max_delay_secs", self.schedule.max_delay_secs),
        ] {
            if secs > MAX_SCHEDULE_SECS {
                anyhow::bail!(
                    "schedule.{} ({}) exceeds the maximum of {} seconds",
                    name,
                    secs,
                    MAX_SCHEDULE_SECS
                );
            }
        }

        if self.format.max_chars < 4 {
            anyhow::bail!("format.max_chars must be at least 4");
        }

        if self.format.max_chars > self.x.max_chars {
            anyhow::bail!(
                "format.max_chars ({}) exceeds x.max_chars ({})",
                self.format.max_chars,
                self.x.max_chars
            );
        }

        match self.general.log_format.as_str() {
            "text" | "json" => {}
            other => anyhow::bail!("Unknown general.log_format: {}", other),
        }

        match self.generator.provider.as_str() {
            "pollinations" | "ollama" | "openai" | "stub" | "none" => Ok(()),
            other => anyhow::bail!("Unknown generator.provider: {}", other),
        }
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# trend-poster configuration

[general]
log_level = "info"
log_format = "text"  # text, json
dry_run = false
# seed = 42

[schedule]
interval_secs = 7200
poll_interval_secs = 60
min_delay_secs = 30
max_delay_secs = 120
media_probability = 0.3

[format]
max_chars = 280

[format.brand]
name = "Nexoxa"
about = "AI content sharing platform"

[sources.hacker_news]
enabled = true
base_url = "https://hacker-news.firebaseio.com"
limit = 10
timeout_secs = 10

[sources.rss]
enabled = true
url = "https://techcrunch.com/feed/"
name = "TechCrunch"
limit = 5
timeout_secs = 10

[sources.reddit]
enabled = true
base_url = "https://www.reddit.com"
subreddit = "programming"
limit = 5
timeout_secs = 10

[sources.insights]
enabled = true
name = "Nexoxa Insights"
# items = ["Ship small, ship often"]

[generator]
provider = "pollinations"  # pollinations, ollama, openai, stub, none
timeout_secs = 30
retries = 1
temperature = 0.8
max_output_tokens = 200

[generator.pollinations]
base_url = "https://text.pollinations.ai"

[generator.ollama]
base_url = "http://localhost:11434"
model = "llama3"

[generator.openai]
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"

[generator.stub]
# reply = "Fixed post text for offline runs"

[media]
enabled = true
access_key_env = "UNSPLASH_ACCESS_KEY"
base_url = "https://api.unsplash.com"
keywords = ["technology", "programming", "coding", "software", "computer", "ai", "tech", "startup", "business"]
max_width = 1200
max_height = 675
jpeg_quality = 85
max_bytes = 5242880
# scratch_dir = "/tmp/trend-poster"
timeout_secs = 30

[x]
api_key_env = "TWITTER_API_KEY"
api_secret_env = "TWITTER_API_SECRET"
access_token_env = "TWITTER_ACCESS_TOKEN"
access_token_secret_env = "TWITTER_ACCESS_TOKEN_SECRET"
api_base_url = "https://api.twitter.com"
upload_base_url = "https://upload.twitter.com"
max_chars = 280
timeout_secs = 30
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_matches_defaults() {
        let parsed: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        let defaults = AppConfig::default();

        assert_eq!(parsed.schedule.interval_secs, defaults.schedule.interval_secs);
        assert_eq!(parsed.generator.provider, defaults.generator.provider);
        assert_eq!(parsed.media.keywords, defaults.media.keywords);
        assert_eq!(parsed.media.max_bytes, defaults.media.max_bytes);
        assert_eq!(parsed.x.access_token_secret_env, "TWITTER_ACCESS_TOKEN_SECRET");
        assert_eq!(parsed.sources.reddit.subreddit, "programming");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let parsed: AppConfig = toml::from_str("").unwrap();

        assert!(!parsed.general.dry_run);
        assert_eq!(parsed.schedule.min_delay_secs, 30);
        assert_eq!(parsed.sources.hacker_news.limit, 10);
        assert_eq!(parsed.sources.rss.limit, 5);
        assert_eq!(parsed.format.brand.name, "Nexoxa");
    }

    #[test]
    fn test_validate_rejects_inverted_delays() {
        let mut config = AppConfig::default();
        config.schedule.min_delay_secs = 200;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_format_limit_above_poster_limit() {
        let mut config = AppConfig::default();
        config.format.max_chars = 400;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("x.max_chars"));

        config.x.max_chars = 400;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_schedule() {
        let mut config = AppConfig::default();
        config.schedule.interval_secs = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.schedule.max_delay_secs = MAX_SCHEDULE_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stub_provider_with_reply() {
        let parsed: AppConfig = toml::from_str(
            r#"
[generator]
provider = "stub"

[generator.stub]
reply = "Canned"
"#,
        )
        .unwrap();

        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.generator.stub.reply.as_deref(), Some("Canned"));
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = AppConfig::default();
        config.generator.provider = "carrier-pigeon".to_string();

        assert!(config.validate().is_err());
    }
}
