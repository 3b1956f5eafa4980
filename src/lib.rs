// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod ingest;
pub mod notify;
pub mod translate;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::config::BotConfig;
pub use crate::ingest::{DigestPipeline, RunReport};
pub use crate::notify::{ChatAttachment, DigestNotifier};
