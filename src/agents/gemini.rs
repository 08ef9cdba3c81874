// Gemini generateContent backend over HTTP

use super::{classifier, GenerationParams, ModelBackend, ModelError, ModelErrorKind};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PROBE_PROMPT: &str = "test";

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    probe_prompt: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, http_timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE, http_timeout)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        http_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .user_agent(concat!("clove/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            probe_prompt: DEFAULT_PROBE_PROMPT.to_string(),
        })
    }

    pub fn with_probe_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.probe_prompt = prompt.into();
        self
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model_id)
    }

    async fn generate_content(
        &self,
        model_id: &str,
        prompt: &str,
        params: Option<&GenerationParams>,
    ) -> Result<String, ModelError> {
        let mut request = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{"text": prompt}],
                }
            ]
        });
        if let Some(params) = params {
            request["generationConfig"] = json!(params);
        }

        let response = self
            .client
            .post(self.endpoint(model_id))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // Error text never carries the request URL
                ModelError::classified(format!(
                    "generateContent request failed: {}",
                    e.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let kind = classifier::classify_status(status.as_u16(), &body);
            log::debug!("[GeminiClient] {} -> {} ({:?})", model_id, status, kind);
            return Err(ModelError::new(
                kind,
                format!("generateContent failed with status {}: {}", status, body),
            ));
        }

        let payload: Value = response.json().await.map_err(|e| {
            ModelError::new(
                ModelErrorKind::Other,
                format!("Failed to parse generateContent response: {}", e),
            )
        })?;

        extract_text(&payload).ok_or_else(|| {
            ModelError::new(
                ModelErrorKind::Other,
                format!("generateContent response from {} carried no text", model_id),
            )
        })
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn probe(&self, model_id: &str) -> Result<(), ModelError> {
        self.generate_content(model_id, &self.probe_prompt, None)
            .await
            .map(|_| ())
    }

    async fn complete(
        &self,
        model_id: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ModelError> {
        self.generate_content(model_id, prompt, Some(params)).await
    }
}

/// Concatenated text parts of the first candidate
fn extract_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
