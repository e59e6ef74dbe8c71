//! Pollinations text endpoint adapter (prompt in the URL path, plain-text reply)

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use std::time::Duration;
use trend_poster_domain::{GenerateError, TextGenerator};

use super::{LlmConfig, transport_error, with_retries};

pub struct PollinationsGenerator {
    client: Client,
    base_url: String,
    config: LlmConfig,
}

impl PollinationsGenerator {
    pub fn new(config: LlmConfig) -> Self {
        Self::with_base_url("https://text.pollinations.ai".to_string(), config)
    }

    pub fn with_base_url(base_url: String, config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    fn request_url(&self, prompt: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(prompt, NON_ALPHANUMERIC)
        )
    }

    async fn call_api(&self, prompt: &str) -> Result<String, GenerateError> {
        let response = self
            .client
            .get(self.request_url(prompt))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == 429 {
            return Err(GenerateError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let text = response.text().await.map_err(transport_error)?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl TextGenerator for PollinationsGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        with_retries(self.config.retries, || self.call_api(prompt)).await
    }

    fn provider(&self) -> &'static str {
        "pollinations"
    }
}
