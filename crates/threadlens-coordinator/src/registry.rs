//! Provider registry keyed by provider kind.

use std::sync::Arc;

use dashmap::DashMap;

use threadlens_config::ProvidersConfig;
use threadlens_protocols::provider::SummaryProvider;
use threadlens_protocols::types::ProviderKind;
use threadlens_provider_gemini::{GeminiAdapter, GeminiSettings};
use threadlens_provider_ollama::{OllamaAdapter, OllamaSettings};

/// Registry of summary providers, one per [`ProviderKind`].
pub struct ProviderRegistry {
    providers: DashMap<ProviderKind, Arc<dyn SummaryProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    /// Registry holding the Gemini and Ollama adapters built from `config`.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let registry = Self::new();
        registry.providers.insert(
            ProviderKind::Gemini,
            Arc::new(GeminiAdapter::new(GeminiSettings {
                base_url: config.gemini.base_url.clone(),
                default_model: config.gemini.default_model.clone(),
                temperature: config.gemini.temperature,
                max_output_tokens: config.gemini.max_output_tokens,
            })),
        );
        registry.providers.insert(
            ProviderKind::Ollama,
            Arc::new(OllamaAdapter::new(OllamaSettings {
                default_openai_model: config.ollama.default_openai_model.clone(),
                temperature: config.ollama.temperature,
                max_tokens: config.ollama.max_tokens,
            })),
        );
        registry
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn SummaryProvider>> {
        self.providers.get(&kind).map(|p| p.clone())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
