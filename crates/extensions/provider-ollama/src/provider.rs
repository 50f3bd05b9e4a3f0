//! Ollama summary provider implementation.

use async_trait::async_trait;
use tracing::{debug, error, warn};

use threadlens_protocols::error::{ErrorKind, ProviderError};
use threadlens_protocols::provider::SummaryProvider;
use threadlens_protocols::types::{ProviderKind, SummarizationRequest, SummarizationResult};

use crate::api::{extract_summary, OllamaRequest};
use crate::client::{build_request, OllamaClient};

/// Chat-protocol parameters and the fallback model name.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaSettings {
    pub default_openai_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            default_openai_model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 150,
        }
    }
}

/// Remove every single quote. Some self-hosted backends splice the prompt
/// into shell commands or templates that break on them.
pub fn sanitize(text: &str) -> String {
    text.replace('\'', "")
}

/// Summary provider for a self-hosted endpoint.
pub struct OllamaAdapter {
    client: OllamaClient,
    settings: OllamaSettings,
}

impl OllamaAdapter {
    pub fn new(settings: OllamaSettings) -> Self {
        Self {
            client: OllamaClient::new(),
            settings,
        }
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }

    pub fn settings(&self) -> &OllamaSettings {
        &self.settings
    }

    /// Configured model, or the default when blank.
    pub fn model_or_default<'a>(&'a self, model: &'a str) -> &'a str {
        let model = model.trim();
        if model.is_empty() {
            &self.settings.default_openai_model
        } else {
            model
        }
    }

    pub(crate) fn build_request(&self, endpoint: &str, request: &SummarizationRequest) -> OllamaRequest {
        let content = format!(
            "{} {}",
            sanitize(request.effective_prompt()),
            sanitize(&request.comment_text)
        );
        build_request(
            endpoint,
            self.model_or_default(&request.provider_config.model),
            &content,
            self.settings.temperature,
            self.settings.max_tokens,
        )
    }

    /// Run the connection test against `endpoint`.
    pub async fn test_connection(&self, endpoint: &str, model: &str) -> Result<(), ProviderError> {
        self.client
            .test_connection(
                endpoint,
                self.model_or_default(model),
                self.settings.temperature,
                self.settings.max_tokens,
            )
            .await
    }

    async fn try_summarize(&self, request: &SummarizationRequest) -> Result<String, ProviderError> {
        let endpoint = request
            .provider_config
            .endpoint()
            .ok_or(ProviderError::MissingEndpoint)?;
        let body = self.build_request(endpoint, request);

        debug!("Ollama summarize: protocol={:?}", body.protocol());

        let value = self.client.send(endpoint, &body).await?;
        extract_summary(body.protocol(), &value).inspect_err(|_| {
            error!("Unexpected API response format: {}", value);
        })
    }
}

impl Default for OllamaAdapter {
    fn default() -> Self {
        Self::new(OllamaSettings::default())
    }
}

#[async_trait]
impl SummaryProvider for OllamaAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn summarize(&self, request: &SummarizationRequest) -> SummarizationResult {
        let result = self.try_summarize(request).await;
        if let Err(e) = &result {
            match e.kind() {
                ErrorKind::Configuration => warn!("Ollama summary skipped: {}", e),
                ErrorKind::Transport | ErrorKind::Format => {
                    error!("Error calling Ollama API: {}", e)
                }
            }
        }
        result.into()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
