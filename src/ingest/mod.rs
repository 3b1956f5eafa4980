// src/ingest/mod.rs
pub mod fetch;
pub mod parse;
pub mod scheduler;
pub mod select;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::BotConfig;
use crate::ingest::fetch::{FeedFetcher, HttpFeedFetcher};
use crate::ingest::select::SelectionPolicy;
use crate::notify::slack::SlackNotifier;
use crate::notify::{render_attachment, DigestNotifier};
use crate::translate::{OpenAiTranslator, Translator};

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Entries parsed from the feed.
    pub fetched: usize,
    /// Entries kept by the selection policy.
    pub selected: usize,
    /// Whether the digest reached the webhook.
    pub notified: bool,
}

/// One linear fetch → parse → select → translate → format → deliver pass.
/// Holds no state across runs; overlapping runs are independent.
pub struct DigestPipeline {
    fetcher: Box<dyn FeedFetcher>,
    /// `None` skips the translation stage entirely.
    translator: Option<Box<dyn Translator>>,
    notifier: Box<dyn DigestNotifier>,
    policy: SelectionPolicy,
}

impl DigestPipeline {
    pub fn new(
        fetcher: Box<dyn FeedFetcher>,
        translator: Option<Box<dyn Translator>>,
        notifier: Box<dyn DigestNotifier>,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            fetcher,
            translator,
            notifier,
            policy,
        }
    }

    /// Wire the real components from validated configuration.
    pub fn from_config(cfg: &BotConfig) -> Self {
        let translator: Option<Box<dyn Translator>> =
            match (&cfg.translate_to, &cfg.openai_api_key) {
                (Some(lang), Some(key)) => {
                    Some(Box::new(OpenAiTranslator::new(key.clone(), lang.clone())))
                }
                _ => None,
            };
        Self::new(
            Box::new(HttpFeedFetcher::new(cfg.feed_url.clone())),
            translator,
            Box::new(SlackNotifier::new(
                cfg.slack_bot_token.clone(),
                cfg.slack_channel.clone(),
            )),
            cfg.policy.clone(),
        )
    }

    /// Run the pipeline once. Fetch, parse, selection, and translation
    /// failures abort the run with nothing delivered. A delivery failure is
    /// logged and absorbed: the run still reports `Ok`, with
    /// `notified = false`.
    pub async fn run_once(&self) -> Result<RunReport> {
        let body = self
            .fetcher
            .fetch()
            .await
            .with_context(|| format!("fetching feed via {}", self.fetcher.name()))?;
        let raw = parse::parse_feed(&body)?;
        let fetched = raw.len();

        let entries = select::select_entries(raw, &self.policy, Utc::now())?;
        tracing::debug!(target: "digest", fetched, selected = entries.len(), "entries selected");

        // Sequential by design: one translation round trip per entry.
        let mut attachments = Vec::with_capacity(entries.len());
        for entry in &entries {
            let translated = match &self.translator {
                Some(t) => Some(
                    t.translate(&entry.summary)
                        .await
                        .context("translating summary")?,
                ),
                None => None,
            };
            attachments.push(render_attachment(entry, translated.as_deref()));
        }

        let notified = match self.notifier.send(&attachments, attachments.len()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(target: "digest", error = ?e, "digest delivery failed");
                false
            }
        };

        Ok(RunReport {
            fetched,
            selected: entries.len(),
            notified,
        })
    }
}
