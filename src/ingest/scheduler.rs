// src/ingest/scheduler.rs
use tokio::task::JoinHandle;

use crate::config::BotConfig;
use crate::ingest::DigestPipeline;

/// Spawn the periodic digest task. Each tick runs the pipeline once; a
/// failed run is logged and the next tick proceeds as usual. Ticks share no
/// mutable state, so a slow run overlapping the next one is wasteful
/// (duplicate digest) but never unsafe.
pub fn spawn_digest_scheduler(cfg: BotConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interval_secs = cfg.interval_secs;
        let pipeline = DigestPipeline::from_config(&cfg);
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            tracing::info!(target: "digest", every_secs = interval_secs, "digest tick");

            match pipeline.run_once().await {
                Ok(report) => {
                    tracing::info!(
                        target: "digest",
                        fetched = report.fetched,
                        selected = report.selected,
                        notified = report.notified,
                        "digest run finished"
                    );
                }
                Err(e) => {
                    tracing::error!(target: "digest", error = ?e, "digest run failed");
                }
            }
        }
    })
}
