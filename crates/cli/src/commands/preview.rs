//! Preview command - show candidate content and a formatted post

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use trend_poster_domain::{
    ContentItem,
    usecases::{ContentAggregator, FormatPath},
};

use crate::args::PreviewArgs;
use crate::config::AppConfig;
use crate::wiring::{build_formatter, build_random, build_sources};

#[derive(Debug, Serialize)]
struct PreviewReport {
    items: Vec<ContentItem>,
    post: Option<PreviewPost>,
}

#[derive(Debug, Serialize)]
struct PreviewPost {
    title: String,
    source: String,
    text: String,
    chars: usize,
    path: String,
}

pub async fn execute(args: PreviewArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let random = build_random(&config);
    let aggregator = ContentAggregator::new(build_sources(&config));
    let formatter = build_formatter(&config, random.clone())?;

    tracing::info!(sources = aggregator.source_count(), "Gathering content");
    let items = aggregator.aggregate().await;

    let post = match random.pick_index(items.len()) {
        Some(index) => {
            let item = &items[index];
            let formatted = formatter.format(item).await;
            Some(PreviewPost {
                title: item.title.clone(),
                source: item.source.clone(),
                chars: formatted.text.chars().count(),
                text: formatted.text,
                path: describe_path(formatted.path),
            })
        }
        None => None,
    };

    let report = PreviewReport { items, post };

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize preview")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn describe_path(path: FormatPath) -> String {
    match path {
        FormatPath::Generated => "generated".to_string(),
        FormatPath::Fallback(set) => format!("fallback ({:?} template)", set).to_lowercase(),
    }
}

fn print_report(report: &PreviewReport) {
    println!("Candidate content ({} items)", report.items.len());
    println!("==========================");

    for item in &report.items {
        let title: String = item
            .title
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(80)
            .collect();
        println!("[{}] {} | {}", item.kind, item.source, title);
        if let Some(ref url) = item.url {
            println!("    {}", url);
        }
    }

    println!();

    match &report.post {
        Some(post) => {
            println!("Formatted post ({} chars, {}):", post.chars, post.path);
            println!("---");
            println!("{}", post.text);
            println!("---");
            let title: String = post.title.chars().take(100).collect();
            println!("From: {} ({})", post.source, title);
        }
        None => println!("No content available; a cycle would be skipped."),
    }
}
