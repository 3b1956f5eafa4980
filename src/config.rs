// src/config.rs
use anyhow::{anyhow, bail, Context, Result};
use std::env;

use crate::ingest::select::SelectionPolicy;

const DEFAULT_FEED_URL: &str = "https://rss.arxiv.org/rss/cs.CL";
const DEFAULT_DAYS_BACK: i64 = 1;
const DEFAULT_INTERVAL_SECS: u64 = 86_400;

/// All runtime configuration, resolved once at startup.
///
/// Every stage receives what it needs from here instead of reading the
/// environment ad hoc, so a missing token fails the boot rather than the
/// first webhook call hours later.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub feed_url: String,
    pub slack_bot_token: String,
    pub slack_channel: String,
    /// Required only when `translate_to` is set.
    pub openai_api_key: Option<String>,
    /// Target language for abstract translation; `None` disables the stage.
    pub translate_to: Option<String>,
    pub policy: SelectionPolicy,
    pub interval_secs: u64,
}

impl BotConfig {
    /// Read configuration from the environment, failing fast on anything
    /// required. `.env` loading is the entrypoint's job.
    pub fn from_env() -> Result<Self> {
        let slack_bot_token = require("SLACK_BOT_ACCESS_TOKEN")?;
        let slack_channel = require("SLACK_BOT_ACCESS_CHANNEL")?;

        let feed_url =
            env::var("ARXIV_FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string());

        let openai_api_key = non_empty(env::var("OPENAI_API_KEY").ok());
        let translate_to = non_empty(env::var("DIGEST_TRANSLATE_TO").ok());
        if translate_to.is_some() && openai_api_key.is_none() {
            bail!("DIGEST_TRANSLATE_TO is set but OPENAI_API_KEY is missing");
        }

        let policy = policy_from_env()?;

        let interval_secs = match env::var("DIGEST_INTERVAL_SECS") {
            Ok(s) => s
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid DIGEST_INTERVAL_SECS: {s:?}"))?,
            Err(_) => DEFAULT_INTERVAL_SECS,
        };
        if interval_secs == 0 {
            bail!("DIGEST_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            feed_url,
            slack_bot_token,
            slack_channel,
            openai_api_key,
            translate_to,
            policy,
            interval_secs,
        })
    }
}

fn require(key: &str) -> Result<String> {
    match non_empty(env::var(key).ok()) {
        Some(v) => Ok(v),
        None => Err(anyhow!("missing required env var {key}")),
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// DIGEST_POLICY selects the predicate variant:
///   "announce-type"  (default) keeps announce type "new"/"cross"
///   "category"        keeps entries tagged DIGEST_CATEGORY
///   "category-on-day" adds a published-day match, DIGEST_DAYS_BACK days ago
fn policy_from_env() -> Result<SelectionPolicy> {
    let kind = env::var("DIGEST_POLICY").unwrap_or_else(|_| "announce-type".to_string());
    match kind.trim() {
        "announce-type" => Ok(SelectionPolicy::AnnounceType),
        "category" => Ok(SelectionPolicy::Category {
            category: require("DIGEST_CATEGORY")?,
        }),
        "category-on-day" => {
            let days_back = match env::var("DIGEST_DAYS_BACK") {
                Ok(s) => s
                    .trim()
                    .parse::<i64>()
                    .with_context(|| format!("invalid DIGEST_DAYS_BACK: {s:?}"))?,
                Err(_) => DEFAULT_DAYS_BACK,
            };
            Ok(SelectionPolicy::CategoryOnDay {
                category: require("DIGEST_CATEGORY")?,
                days_back,
            })
        }
        other => Err(anyhow!("unsupported DIGEST_POLICY: {other:?}")),
    }
}
