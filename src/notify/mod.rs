// src/notify/mod.rs
//! Attachment formatting and digest delivery.

pub mod slack;

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::ingest::select::NormalizedEntry;

/// Attachment color used for every digest entry.
pub const ATTACHMENT_COLOR: &str = "#00FF00";
const SUMMARY_CHAR_BUDGET: usize = 500;

/// Slack-attachment-shaped record, built 1:1 from a kept entry and consumed
/// once by the notifier.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatAttachment {
    pub color: String,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
}

#[async_trait]
pub trait DigestNotifier: Send + Sync {
    async fn send(&self, attachments: &[ChatAttachment], count: usize) -> Result<()>;
}

/// Pure formatter from a normalized entry (plus optional translated summary)
/// to one attachment.
pub fn render_attachment(entry: &NormalizedEntry, translated: Option<&str>) -> ChatAttachment {
    // A supplied translation replaces the summary verbatim; the raw summary
    // is cleaned and cut to a fixed budget. The ellipsis marker is appended
    // unconditionally, matching the bot's historical output.
    let summary = match translated {
        Some(t) => t.to_string(),
        None => {
            let mut s = truncate_chars(&clean_summary(&entry.summary), SUMMARY_CHAR_BUDGET);
            s.push_str(" ...");
            s
        }
    };

    let text = format!(
        "*Published:* {}\n*Authors:* {}\n*Categories:* {}\n*Page:* {}\n*PDF:* {}\n{}",
        entry.published,
        entry.authors.join(", "),
        entry.categories.join(", "),
        entry.page_url,
        entry.pdf_url,
        summary
    );

    ChatAttachment {
        color: ATTACHMENT_COLOR.to_string(),
        title: entry.title.clone(),
        text,
        author_name: Some("arXiv-bot".to_string()),
        title_link: Some(entry.page_url.clone()),
    }
}

/// Decode HTML entities, collapse whitespace runs to single spaces, trim.
pub fn clean_summary(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
