// src/translate.rs
//! Optional translation stage: one hosted text-generation call per abstract.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const INSTRUCTIONS: &str = "You are a research-paper translation assistant.";

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the translator's configured language.
    /// An empty service reply yields an empty string, not an error;
    /// transport and auth failures propagate.
    async fn translate(&self, text: &str) -> Result<String>;
}

pub struct OpenAiTranslator {
    http: reqwest::Client,
    api_key: String,
    model: String,
    language: String,
}

impl OpenAiTranslator {
    pub fn new(api_key: String, language: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("arxiv-digest-bot/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            language,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    instructions: &'a str,
    input: String,
}

#[derive(Deserialize)]
struct Resp {
    output_text: Option<String>,
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let req = Req {
            model: &self.model,
            instructions: INSTRUCTIONS,
            input: format!(
                "Translate the following text into {}:\n\n\"{}\"",
                self.language, text
            ),
        };

        let resp = self
            .http
            .post(RESPONSES_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("translation post")?
            .error_for_status()
            .context("translation non-2xx")?;

        let body: Resp = resp.json().await.context("translation response json")?;
        Ok(body.output_text.unwrap_or_default())
    }
}
