//! Doctor command - validate configuration and show status

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use trend_poster_adapters::x::XPoster;

use crate::args::DoctorArgs;
use crate::config::AppConfig;
use crate::wiring::{load_x_credentials, x_config};

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    sources: CheckResult,
    generator: CheckResult,
    media: CheckResult,
    x: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        sources: CheckResult::error("Not checked"),
        generator: CheckResult::error("Not checked"),
        media: CheckResult::error("Not checked"),
        x: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.sources = check_sources(config);
        report.generator = check_generator(config);
        report.media = check_media(config);
        report.x = check_x(config, args.verify).await;
    }

    let checks = [
        &report.config,
        &report.sources,
        &report.generator,
        &report.media,
        &report.x,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn check_sources(config: &AppConfig) -> CheckResult {
    let sources = &config.sources;
    let enabled: Vec<&str> = [
        (sources.hacker_news.enabled, "hacker_news"),
        (sources.rss.enabled, "rss"),
        (sources.reddit.enabled, "reddit"),
        (sources.insights.enabled, "insights"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();

    if enabled.is_empty() {
        return CheckResult::error("No content sources enabled");
    }

    let result = CheckResult::ok(format!("Enabled: {}", enabled.join(", ")));
    let result = result.with_details(serde_json::json!({ "enabled": enabled }));

    if !sources.insights.enabled {
        return CheckResult::warn(format!(
            "{} (insights disabled, cycles may be skipped when feeds are down)",
            result.message
        ));
    }

    result
}

fn check_generator(config: &AppConfig) -> CheckResult {
    let generator = &config.generator;

    match generator.provider.as_str() {
        "none" => CheckResult::ok("Provider: none (templates only)"),
        "pollinations" => CheckResult::ok(format!(
            "Provider: pollinations, base_url: {}",
            generator.pollinations.base_url
        )),
        "stub" => match &generator.stub.reply {
            Some(_) => CheckResult::ok("Provider: stub (fixed reply)"),
            None => CheckResult::warn("Provider: stub without a reply (templates only)"),
        },
        "ollama" => CheckResult::ok(format!(
            "Provider: ollama, Model: {}, base_url: {}",
            generator.ollama.model, generator.ollama.base_url
        )),
        "openai" => {
            let env_var = &generator.openai.api_key_env;
            if env_var.is_empty() {
                return CheckResult::error("No API key env var configured for openai");
            }

            match std::env::var(env_var) {
                Ok(val) if !val.is_empty() => CheckResult::ok(format!(
                    "Provider: openai, Model: {}, API key: {} (set)",
                    generator.openai.model, env_var
                )),
                _ => CheckResult::error(format!(
                    "Provider: openai, Model: {}, API key: {} (not set)",
                    generator.openai.model, env_var
                )),
            }
        }
        other => CheckResult::error(format!("Unknown provider: {}", other)),
    }
}

fn check_media(config: &AppConfig) -> CheckResult {
    let media = &config.media;
    if !media.enabled {
        return CheckResult::ok("Media disabled");
    }

    let scratch = media
        .scratch_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);

    match std::env::var(&media.access_key_env) {
        Ok(val) if !val.is_empty() => CheckResult::ok(format!(
            "Unsplash key: {} (set), {}x{}, scratch: {}",
            media.access_key_env,
            media.max_width,
            media.max_height,
            scratch.display()
        )),
        _ => CheckResult::warn(format!(
            "Unsplash key: {} (not set), posts will be text-only",
            media.access_key_env
        )),
    }
}

async fn check_x(config: &AppConfig, verify: bool) -> CheckResult {
    let env_vars = [
        &config.x.api_key_env,
        &config.x.api_secret_env,
        &config.x.access_token_env,
        &config.x.access_token_secret_env,
    ];

    let missing: Vec<&str> = env_vars
        .iter()
        .filter(|name| {
            std::env::var(name.as_str())
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|name| name.as_str())
        .collect();

    if !missing.is_empty() {
        let message = format!("Missing credentials: {}", missing.join(", "));
        return if config.general.dry_run {
            CheckResult::warn(format!("{} (dry_run enabled)", message))
        } else {
            CheckResult::error(message)
        };
    }

    if !verify {
        return CheckResult::ok("Credentials: 4/4 set (not verified, use --verify)");
    }

    let credentials = match load_x_credentials(config) {
        Ok(c) => c,
        Err(e) => return CheckResult::error(format!("{:#}", e)),
    };

    match XPoster::new(credentials, x_config(config))
        .verify_credentials()
        .await
    {
        Ok(handle) => CheckResult::ok(format!("Credentials verified for @{}", handle))
            .with_details(serde_json::json!({ "screen_name": handle })),
        Err(e) => CheckResult::error(format!("Credential verification failed: {}", e)),
    }
}

fn print_report(report: &DoctorReport) {
    println!("trend-poster Doctor Report");
    println!("==========================");
    println!();

    print_check("Config", &report.config);
    print_check("Sources", &report.sources);
    print_check("Generator", &report.generator);
    print_check("Media", &report.media);
    print_check("X", &report.x);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall != "error" {
        println!();
        println!("Ready to run! Try: trend-poster run --dry-run --single-post");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
