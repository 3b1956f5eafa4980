// src/notify/slack.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{ChatAttachment, DigestNotifier};

const CHAT_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

pub struct SlackNotifier {
    url: String,
    token: String,
    channel: String,
    client: Client,
}

impl SlackNotifier {
    pub fn new(token: String, channel: String) -> Self {
        Self {
            url: CHAT_POST_MESSAGE_URL.to_string(),
            token,
            channel,
            client: Client::new(),
        }
    }

    /// Override the endpoint; used by tests and local tools.
    pub fn with_url(mut self, url: String) -> Self {
        self.url = url;
        self
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    channel: &'a str,
    text: String,
    attachments: &'a [ChatAttachment],
}

#[async_trait]
impl DigestNotifier for SlackNotifier {
    async fn send(&self, attachments: &[ChatAttachment], count: usize) -> Result<()> {
        let payload = Payload {
            channel: &self.channel,
            text: format!("{count} new arXiv listings"),
            attachments,
        };

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .context("slack post")?
            .error_for_status()
            .context("slack non-2xx")?;

        let body: serde_json::Value = resp.json().await.context("slack response json")?;
        tracing::info!(target: "digest", response = %body, "slack response");
        Ok(())
    }
}
