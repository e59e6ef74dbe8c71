//! trend-poster adapters crate
//!
//! Infrastructure adapters implementing the domain ports:
//! - `sources`: Hacker News, RSS, Reddit and static insight sources
//! - `llm`: text generators (Pollinations, Ollama, OpenAI, stub)
//! - `media`: Unsplash photo fetching and JPEG preparation
//! - `x`: X (Twitter) posting with OAuth 1.0a
//! - `outbox`: JSONL poster for dry runs

pub mod llm;
pub mod media;
pub mod outbox;
pub mod sources;
pub mod x_api;

/// Re-exports for X API adapters
pub mod x {
    pub use crate::x_api::{XConfig, XCredentials, XPoster};
}
