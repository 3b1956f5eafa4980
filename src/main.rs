//! arXiv Digest Bot — Binary Entrypoint
//! Boots the Axum test surface and the background digest scheduler.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use arxiv_digest_bot::config::BotConfig;
use arxiv_digest_bot::ingest::scheduler::spawn_digest_scheduler;
use arxiv_digest_bot::api;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Fail fast: a missing token aborts the boot here instead of surfacing
    // as an auth failure on the first scheduled run.
    let cfg = BotConfig::from_env().context("loading configuration")?;
    tracing::info!(
        feed = %cfg.feed_url,
        translate = cfg.translate_to.is_some(),
        every_secs = cfg.interval_secs,
        "configuration loaded"
    );

    spawn_digest_scheduler(cfg);

    Ok(api::create_router().into())
}
