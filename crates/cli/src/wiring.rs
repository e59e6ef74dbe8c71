//! Builds domain components from the loaded configuration

use anyhow::{Context, Result, bail};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use trend_poster_adapters::{
    llm::{LlmConfig, OllamaGenerator, OpenAiGenerator, PollinationsGenerator, StubGenerator},
    media::{ImageLimits, UnsplashConfig, UnsplashMediaFetcher},
    sources::{
        HackerNewsSource, RedditSource, RssFeedSource, SourceConfig, StaticInsightsSource,
    },
    x::{XConfig, XCredentials},
};
use trend_poster_domain::{
    Clock, ContentSource, MediaFetcher, RandomSource, SocialPoster, SystemClock, TextGenerator,
    templates::Brand,
    usecases::{
        ContentAggregator, CycleConfig, FormatConfig, PostPublisher, PostingCycle, ScheduleConfig,
        TweetFormatter,
    },
};

use crate::config::AppConfig;

pub(crate) fn load_api_key(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No API key env var configured for provider {}", provider);
    }

    let key = std::env::var(env_var).with_context(|| {
        format!(
            "Missing API key env var {} for provider {}",
            env_var, provider
        )
    })?;

    if key.trim().is_empty() {
        bail!(
            "API key env var {} is empty for provider {}",
            env_var,
            provider
        );
    }

    Ok(SecretString::new(key.into()))
}

/// Read the four X credentials; any missing or empty one is an error
pub(crate) fn load_x_credentials(config: &AppConfig) -> Result<XCredentials> {
    Ok(XCredentials {
        api_key: load_api_key(&config.x.api_key_env, "x")?,
        api_secret: load_api_key(&config.x.api_secret_env, "x")?,
        access_token: load_api_key(&config.x.access_token_env, "x")?,
        access_token_secret: load_api_key(&config.x.access_token_secret_env, "x")?,
    })
}

pub(crate) fn x_config(config: &AppConfig) -> XConfig {
    XConfig {
        api_base_url: config.x.api_base_url.clone(),
        upload_base_url: config.x.upload_base_url.clone(),
        max_chars: config.x.max_chars,
        timeout_secs: config.x.timeout_secs,
    }
}

pub(crate) fn build_random(config: &AppConfig) -> Arc<RandomSource> {
    Arc::new(RandomSource::from_seed_option(config.general.seed))
}

pub(crate) fn build_sources(config: &AppConfig) -> Vec<Arc<dyn ContentSource>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sources = &config.sources;
    let mut built: Vec<Arc<dyn ContentSource>> = Vec::new();

    if sources.hacker_news.enabled {
        built.push(Arc::new(HackerNewsSource::with_base_url(
            sources.hacker_news.base_url.clone(),
            SourceConfig {
                limit: sources.hacker_news.limit,
                timeout_secs: sources.hacker_news.timeout_secs,
            },
            clock.clone(),
        )));
    }

    if sources.rss.enabled {
        built.push(Arc::new(RssFeedSource::new(
            sources.rss.url.clone(),
            sources.rss.name.clone(),
            SourceConfig {
                limit: sources.rss.limit,
                timeout_secs: sources.rss.timeout_secs,
            },
            clock.clone(),
        )));
    }

    if sources.reddit.enabled {
        built.push(Arc::new(RedditSource::with_base_url(
            sources.reddit.base_url.clone(),
            sources.reddit.subreddit.clone(),
            sources.reddit.user_agent.clone(),
            SourceConfig {
                limit: sources.reddit.limit,
                timeout_secs: sources.reddit.timeout_secs,
            },
            clock.clone(),
        )));
    }

    if sources.insights.enabled {
        let insights = if sources.insights.items.is_empty() {
            StaticInsightsSource::with_defaults(sources.insights.name.clone(), clock)
        } else {
            StaticInsightsSource::new(
                sources.insights.items.clone(),
                sources.insights.name.clone(),
                clock,
            )
        };
        built.push(Arc::new(insights));
    }

    built
}

/// `None` when the provider is "none"
pub(crate) fn build_generator(config: &AppConfig) -> Result<Option<Arc<dyn TextGenerator>>> {
    let generator = &config.generator;
    let llm_config = |model: &str| LlmConfig {
        model: model.to_string(),
        temperature: generator.temperature,
        max_output_tokens: generator.max_output_tokens,
        timeout_secs: generator.timeout_secs,
        retries: generator.retries,
    };

    match generator.provider.as_str() {
        "none" => Ok(None),
        "pollinations" => Ok(Some(Arc::new(PollinationsGenerator::with_base_url(
            generator.pollinations.base_url.clone(),
            llm_config("openai"),
        )))),
        "ollama" => Ok(Some(Arc::new(OllamaGenerator::with_base_url(
            generator.ollama.base_url.clone(),
            llm_config(&generator.ollama.model),
        )))),
        "openai" => {
            let api_key = load_api_key(&generator.openai.api_key_env, "openai")?;
            Ok(Some(Arc::new(OpenAiGenerator::with_base_url(
                api_key,
                generator.openai.base_url.clone(),
                llm_config(&generator.openai.model),
            ))))
        }
        "stub" => Ok(Some(Arc::new(match &generator.stub.reply {
            Some(reply) => StubGenerator::with_reply(reply.clone()),
            None => StubGenerator::failing(),
        }))),
        other => bail!("Unknown generator provider: {}", other),
    }
}

pub(crate) fn build_formatter(
    config: &AppConfig,
    random: Arc<RandomSource>,
) -> Result<TweetFormatter> {
    let generator = build_generator(config)?;

    Ok(TweetFormatter::new(
        generator,
        random,
        FormatConfig {
            max_chars: config.format.max_chars,
            brand: Brand {
                name: config.format.brand.name.clone(),
                about: config.format.brand.about.clone(),
            },
        },
    ))
}

/// `None` when media is disabled; a missing access key surfaces per cycle
pub(crate) fn build_media_fetcher(
    config: &AppConfig,
    random: Arc<RandomSource>,
) -> Option<Arc<dyn MediaFetcher>> {
    let media = &config.media;
    if !media.enabled {
        return None;
    }

    let access_key = std::env::var(&media.access_key_env)
        .ok()
        .map(|k| SecretString::new(k.into()));

    let fetcher = UnsplashMediaFetcher::new(
        access_key,
        UnsplashConfig {
            base_url: media.base_url.clone(),
            keywords: media.keywords.clone(),
            limits: ImageLimits {
                max_width: media.max_width,
                max_height: media.max_height,
                jpeg_quality: media.jpeg_quality,
                max_bytes: media.max_bytes,
            },
            scratch_dir: media
                .scratch_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            timeout_secs: media.timeout_secs,
        },
        random,
    );

    if !fetcher.is_configured() {
        tracing::warn!(
            env_var = %media.access_key_env,
            "Media enabled but no access key set, posts will go out without images"
        );
    }

    Some(Arc::new(fetcher))
}

pub(crate) fn cycle_config(config: &AppConfig) -> CycleConfig {
    CycleConfig {
        media_probability: config.schedule.media_probability,
        min_delay: Duration::from_secs(config.schedule.min_delay_secs),
        max_delay: Duration::from_secs(config.schedule.max_delay_secs),
    }
}

pub(crate) fn schedule_config(config: &AppConfig) -> ScheduleConfig {
    ScheduleConfig {
        period: Duration::from_secs(config.schedule.interval_secs),
        poll_interval: Duration::from_secs(config.schedule.poll_interval_secs),
    }
}

pub(crate) fn build_cycle(
    config: &AppConfig,
    poster: Arc<dyn SocialPoster>,
) -> Result<PostingCycle> {
    let random = build_random(config);
    let aggregator = ContentAggregator::new(build_sources(config));
    let formatter = build_formatter(config, random.clone())?;
    let media_fetcher = build_media_fetcher(config, random.clone());

    Ok(PostingCycle::new(
        aggregator,
        formatter,
        media_fetcher,
        PostPublisher::new(poster),
        random,
        cycle_config(config),
    ))
}
