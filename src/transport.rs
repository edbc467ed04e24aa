use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Result, StudyError};
use crate::models::{GeminiRequest, GeminiResponse, GenerateRequest};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit one prompt with its output-shape descriptor and return the raw model text
    async fn generate_content(&self, req: &GenerateRequest) -> Result<String>;
}

pub struct GeminiTransport {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiTransport {
    pub fn new(cfg: &GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if cfg.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(cfg.timeout_seconds));
        }
        let client = builder
            .build()
            .map_err(|e| StudyError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate_content(&self, req: &GenerateRequest) -> Result<String> {
        tracing::debug!(model = %req.model, "Sending generateContent request");

        // Single attempt; failures are reported to the caller as-is
        let response = self
            .client
            .post(self.endpoint(&req.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&GeminiRequest::from(req))
            .send()
            .await
            .map_err(|e| {
                StudyError::Transport(format!("Failed to send request to Gemini API: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StudyError::Transport(format!(
                "Gemini API error ({status}): {body}"
            )));
        }

        let body: GeminiResponse = response.json().await.map_err(|e| {
            StudyError::Transport(format!("Failed to decode Gemini API response: {e}"))
        })?;

        body.text().ok_or_else(|| {
            StudyError::Transport("Gemini API returned no text candidates".to_string())
        })
    }
}
