//! Run command - scheduled or single posting

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use trend_poster_adapters::{
    outbox::{OutboxPoster, OutboxWriter},
    x::XPoster,
};
use trend_poster_domain::{
    CycleOutcome, SocialPoster,
    usecases::Scheduler,
};

use crate::args::RunArgs;
use crate::config::AppConfig;
use crate::wiring::{build_cycle, load_x_credentials, schedule_config, x_config};

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let dry_run = args.dry_run || config.general.dry_run;
    if args.outbox.is_some() && !dry_run {
        tracing::warn!("--outbox is ignored without --dry-run");
    }

    let poster = build_poster(&config, dry_run, args.outbox).await?;

    tracing::info!(
        dry_run = dry_run,
        single_post = args.single_post,
        platform = poster.platform(),
        generator = %config.generator.provider,
        interval_secs = config.schedule.interval_secs,
        "Starting trend-poster run"
    );

    let cycle = build_cycle(&config, poster)?;
    let scheduler = Scheduler::new(schedule_config(&config));

    if args.single_post {
        let outcome = scheduler
            .run_single(&cycle)
            .await
            .context("Posting cycle failed")?;

        match outcome {
            CycleOutcome::Posted {
                receipt, source, ..
            } => {
                tracing::info!(
                    post_id = %receipt.id,
                    url = ?receipt.url,
                    source = %source,
                    "Single post complete"
                );
            }
            CycleOutcome::Skipped { reason } => {
                tracing::info!(reason = %reason, "Nothing posted");
            }
        }
    } else {
        let shutdown = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        let cycles = scheduler.run_continuous(&cycle, shutdown).await;
        tracing::info!(cycles = cycles, "Shutting down gracefully");
    }

    tracing::info!("trend-poster run completed");
    Ok(())
}

async fn build_poster(
    config: &AppConfig,
    dry_run: bool,
    outbox: Option<PathBuf>,
) -> Result<Arc<dyn SocialPoster>> {
    if dry_run {
        let writer = OutboxWriter::new(outbox.unwrap_or_else(default_outbox_path))
            .await
            .context("Failed to initialize outbox writer")?;

        tracing::info!(outbox = %writer.path().display(), "Dry run: writing posts to outbox");
        return Ok(Arc::new(OutboxPoster::new(writer)));
    }

    let credentials = load_x_credentials(config).context("X credentials are not configured")?;
    Ok(Arc::new(XPoster::new(credentials, x_config(config))))
}

fn default_outbox_path() -> PathBuf {
    PathBuf::from("./outbox.jsonl")
}
