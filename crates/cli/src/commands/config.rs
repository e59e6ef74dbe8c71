//! Config command - configuration management

use anyhow::{Context, Result};
use std::path::Path;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => init_config(&path, force).await,
    }
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    tokio::fs::write(path, AppConfig::example_toml())
        .await
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Export TWITTER_API_KEY, TWITTER_API_SECRET, TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_TOKEN_SECRET"
    );
    println!("  2. Optionally export UNSPLASH_ACCESS_KEY to attach photos");
    println!("  3. Run 'trend-poster doctor --config {}'", path.display());
    println!("  4. Run 'trend-poster run --dry-run --single-post' to test");

    Ok(())
}
