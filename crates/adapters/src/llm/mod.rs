//! Text generation adapters

pub mod ollama;
pub mod openai;
pub mod pollinations;
pub mod stub;

pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use pollinations::PollinationsGenerator;
pub use stub::StubGenerator;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use trend_poster_domain::GenerateError;

/// Common generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID (ignored by providers without model selection)
    pub model: String,
    /// Temperature (0.0-1.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries on failure
    pub retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "openai".to_string(),
            temperature: 0.8,
            max_output_tokens: 200,
            timeout_secs: 30,
            retries: 1,
        }
    }
}

/// Instruction sent alongside prompts to chat-style providers
pub(crate) const SYSTEM_INSTRUCTION: &str =
    "You write short social media posts. Reply with the post text only, no quotes or commentary.";

/// Run `call` up to `retries + 1` times with exponential backoff
pub(crate) async fn with_retries<F, Fut>(retries: u32, mut call: F) -> Result<String, GenerateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, GenerateError>>,
{
    let mut last_error = None;
    for attempt in 0..=retries {
        if attempt > 0 {
            tracing::warn!(attempt = attempt, "Retrying generation");
            tokio::time::sleep(Duration::from_millis(500 * 2_u64.pow(attempt))).await;
        }

        match call().await {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => last_error = Some(GenerateError::Empty),
            Err(GenerateError::RateLimited) => return Err(GenerateError::RateLimited),
            Err(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or_else(|| GenerateError::Api("Unknown error".to_string())))
}

/// Map a reqwest transport error onto the generation taxonomy
pub(crate) fn transport_error(e: reqwest::Error) -> GenerateError {
    if e.is_timeout() {
        GenerateError::Timeout
    } else {
        GenerateError::Api(e.to_string())
    }
}
