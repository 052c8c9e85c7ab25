//! OCR service transport and retry

use crate::config::{OcrConfig, UserAgentConfig};
use crate::ocr::OcrError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::time::Duration;

/// Longest error body kept in an [`OcrError::Api`]
const MAX_ERROR_BODY: usize = 500;

/// Sends one PDF to an OCR service and returns the raw JSON response
#[async_trait]
pub trait OcrService: Send + Sync {
    async fn process(&self, pdf: &[u8]) -> Result<Value, OcrError>;
}

/// Encodes a PDF as a `data:` URL
pub fn pdf_data_url(pdf: &[u8]) -> String {
    format!("data:application/pdf;base64,{}", STANDARD.encode(pdf))
}

/// Mistral document OCR over HTTPS
pub struct MistralOcrClient {
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl MistralOcrClient {
    pub fn new(
        config: &OcrConfig,
        user_agent: &UserAgentConfig,
        api_key: String,
    ) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.header_value())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl OcrService for MistralOcrClient {
    async fn process(&self, pdf: &[u8]) -> Result<Value, OcrError> {
        let body = json!({
            "model": self.model,
            "document": {
                "type": "document_url",
                "document_url": pdf_data_url(pdf),
            },
            "include_image_base64": false,
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(OcrError::Api {
                status: status.as_u16(),
                message: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|e| OcrError::UnexpectedShape {
            reason: format!("invalid JSON: {}", e),
            raw: text,
        })
    }
}

/// Bounded linear backoff: the n-th retry waits `backoff * n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            backoff: Duration::try_from_secs_f64(config.backoff_secs).unwrap_or_default(),
        }
    }

    /// Delay after the given failed attempt (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }

    /// Calls the service until it succeeds, fails for good, or attempts run out
    pub async fn process<S: OcrService + ?Sized>(
        &self,
        service: &S,
        pdf: &[u8],
    ) -> Result<Value, OcrError> {
        let mut attempt = 0;
        loop {
            match service.process(pdf).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if !e.is_transient() || attempt >= self.max_attempts {
                        return Err(e);
                    }
                    let delay = self.delay(attempt);
                    tracing::warn!(
                        "OCR attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
