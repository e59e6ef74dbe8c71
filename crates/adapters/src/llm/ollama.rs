//! Ollama local LLM adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use trend_poster_domain::{GenerateError, TextGenerator};

use super::{LlmConfig, SYSTEM_INSTRUCTION, transport_error, with_retries};

/// Generator backed by a local Ollama server
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    config: LlmConfig,
}

impl OllamaGenerator {
    pub fn new(config: LlmConfig) -> Self {
        Self::with_base_url("http://localhost:11434".to_string(), config)
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

    async fn call_api(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = OllamaRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            system: Some(SYSTEM_INSTRUCTION.to_string()),
            stream: false,
            options: Some(OllamaOptions {
                temperature: Some(self.config.temperature),
                num_predict: Some(self.config.max_output_tokens as i32),
            }),
        };

        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let api_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Api(format!("Invalid response: {}", e)))?;

        Ok(api_response.response.trim().to_string())
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        with_retries(self.config.retries, || self.call_api(prompt)).await
    }

    fn provider(&self) -> &'static str {
        "ollama"
    }
}
