// src/ingest/fetch.rs
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Source of raw feed text for one run.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// One GET against a fixed URL. The HTTP status is deliberately not
/// inspected here: a non-2xx text body flows downstream and fails at parse
/// time, keeping the fetcher a pure transport step.
pub struct HttpFeedFetcher {
    url: String,
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("feed http get {}", self.url))?;
        resp.text().await.context("feed http .text()")
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Serves a canned document; used in tests and local dry runs.
pub struct FixtureFeedFetcher {
    body: String,
}

impl FixtureFeedFetcher {
    pub fn from_str(s: &str) -> Self {
        Self {
            body: s.to_string(),
        }
    }
}

#[async_trait]
impl FeedFetcher for FixtureFeedFetcher {
    async fn fetch(&self) -> Result<String> {
        Ok(self.body.clone())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
