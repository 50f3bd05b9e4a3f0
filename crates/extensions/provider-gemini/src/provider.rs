//! Gemini summary provider implementation.

use async_trait::async_trait;
use tracing::{debug, error, warn};

use threadlens_protocols::error::{ErrorKind, ProviderError};
use threadlens_protocols::provider::SummaryProvider;
use threadlens_protocols::types::{ProviderKind, SummarizationRequest, SummarizationResult};

use crate::client::{GeminiClient, DEFAULT_BASE_URL};
use crate::types::*;

/// Fixed generation parameters and the fallback model.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub base_url: String,
    pub default_model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: "gemini-1.5-flash".to_string(),
            temperature: 0.2,
            max_output_tokens: 100,
        }
    }
}

/// Gemini summary provider.
pub struct GeminiAdapter {
    client: GeminiClient,
    settings: GeminiSettings,
}

impl GeminiAdapter {
    pub fn new(settings: GeminiSettings) -> Self {
        Self {
            client: GeminiClient::with_base_url(&settings.base_url),
            settings,
        }
    }

    pub fn client(&self) -> &GeminiClient {
        &self.client
    }

    fn model<'a>(&'a self, request: &'a SummarizationRequest) -> &'a str {
        let model = request.provider_config.model.trim();
        if model.is_empty() {
            &self.settings.default_model
        } else {
            model
        }
    }

    pub(crate) fn build_request(&self, request: &SummarizationRequest) -> GenerateContentRequest {
        let text = format!(
            "{} \"{}\"",
            request.effective_prompt(),
            request.comment_text
        );
        GenerateContentRequest::single_turn(
            text,
            GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        )
    }

    async fn try_summarize(&self, request: &SummarizationRequest) -> Result<String, ProviderError> {
        let api_key = request
            .provider_config
            .credential()
            .ok_or(ProviderError::MissingApiKey)?;
        let model = self.model(request);

        debug!("Sending request to Gemini API using model {}", model);

        let response = self
            .client
            .generate_content(api_key, model, &self.build_request(request))
            .await?;

        match response.first_text() {
            Some(text) => Ok(text.trim().to_string()),
            None => {
                error!("Unexpected Gemini response format: {:?}", response);
                Err(ProviderError::UnexpectedFormat)
            }
        }
    }
}

impl Default for GeminiAdapter {
    fn default() -> Self {
        Self::new(GeminiSettings::default())
    }
}

#[async_trait]
impl SummaryProvider for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn summarize(&self, request: &SummarizationRequest) -> SummarizationResult {
        let result = self.try_summarize(request).await;
        if let Err(e) = &result {
            match e.kind() {
                ErrorKind::Configuration => warn!("Gemini summary skipped: {}", e),
                ErrorKind::Transport | ErrorKind::Format => {
                    error!("Error calling Gemini API: {}", e)
                }
            }
        }
        result.into()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
