//! HTTP client for self-hosted endpoints.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use threadlens_protocols::error::ProviderError;

use crate::api::*;

/// Prompt sent by [`OllamaClient::test_connection`].
pub const CONNECTION_TEST_PROMPT: &str =
    "Test connection. Please respond with Connection successful.";

/// HTTP client for a user-supplied endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
}

impl OllamaClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Post `request` and return the parsed JSON body.
    ///
    /// The body is read as text first: an empty body and a body that is
    /// not JSON are reported distinctly from HTTP failures.
    pub async fn send(&self, endpoint: &str, request: &OllamaRequest) -> Result<Value, ProviderError> {
        let url = request.protocol().url(endpoint);
        debug!("Sending request to custom API at {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut message = format!("{} {}", status.as_u16(), status_text(status));
            match response.text().await {
                Ok(body) => {
                    error!("API Error Response ({}): {}", status.as_u16(), body);
                    message.push_str(" - ");
                    message.push_str(&body);
                }
                Err(_) => error!("Unable to read error response"),
            }
            return Err(ProviderError::Api(message));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Read(e.to_string()))?;
        debug!("Raw response text: {}", text);
        parse_body(&text)
    }

    /// Send the canned connection-test prompt and check the reply shape.
    ///
    /// `model` is only used for OpenAI-compatible endpoints.
    pub async fn test_connection(
        &self,
        endpoint: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<(), ProviderError> {
        let request = build_request(endpoint, model, CONNECTION_TEST_PROMPT, temperature, max_tokens);
        let url = request.protocol().url(endpoint);
        debug!("Testing connection to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
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

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Read(e.to_string()))?;
        let body = parse_body(&text)?;

        if is_successful_reply(request.protocol(), &body) {
            Ok(())
        } else {
            error!("Unexpected API response format: {}", body);
            Err(ProviderError::UnexpectedFormat)
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the request body for the protocol `endpoint` speaks.
pub(crate) fn build_request(
    endpoint: &str,
    model: &str,
    content: &str,
    temperature: f32,
    max_tokens: u32,
) -> OllamaRequest {
    match Protocol::for_endpoint(endpoint) {
        Protocol::OpenAiChat => OllamaRequest::Chat(ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: content.to_string(),
            }],
            temperature,
            max_tokens,
            stream: false,
        }),
        Protocol::Native => OllamaRequest::Generate(GenerateRequest {
            prompt: content.to_string(),
            stream: false,
        }),
    }
}

fn parse_body(text: &str) -> Result<Value, ProviderError> {
    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    serde_json::from_str(text).map_err(|e| {
        error!("JSON parsing error: {} (response text: {})", e, text);
        ProviderError::Parse(e.to_string())
    })
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown Status").to_string()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
