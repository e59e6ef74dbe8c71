//! Stub generator for testing and offline mode

use async_trait::async_trait;
use trend_poster_domain::{GenerateError, TextGenerator};

/// Generator that returns a fixed reply or always fails
pub struct StubGenerator {
    reply: Option<String>,
}

impl StubGenerator {
    /// Always return `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }

    /// Always fail, forcing the template fallback
    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(GenerateError::Api("stub generator has no reply".to_string())),
        }
    }

    fn provider(&self) -> &'static str {
        "stub"
    }
}
