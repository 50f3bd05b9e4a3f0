//! Gemini API client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use threadlens_protocols::error::ProviderError;

use crate::types::*;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a client against the public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (e.g. a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate content (non-streaming).
    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, api_key
        );

        debug!("Gemini generate_content: model={}", model);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Read(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .ok()
                .and_then(|e| e.message().map(str::to_string))
                .unwrap_or_else(|| status_text(status));
            warn!("Gemini API error {}: {}", status.as_u16(), message);
            return Err(ProviderError::Api(message));
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
    }

    /// List the models available to `api_key`. Doubles as a credential probe.
    pub async fn list_models(&self, api_key: &str) -> Result<ModelList, ProviderError> {
        let url = format!("{}/models?key={}", self.base_url, api_key);

        debug!("Gemini list_models");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api(format!(
                "{} {}",
                status.as_u16(),
                status_text(status)
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Read(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown Status").to_string()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
