//! Provider configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Endpoint suffix that selects the OpenAI-compatible chat protocol.
pub const OPENAI_COMPATIBLE_SUFFIX: &str = "/v1";

/// Configured summarization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hosted key + model API.
    #[default]
    Gemini,
    /// Self-hosted endpoint, native or OpenAI-compatible.
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Whether an endpoint string selects the OpenAI-compatible protocol.
pub fn is_openai_compatible(endpoint: &str) -> bool {
    endpoint.ends_with(OPENAI_COMPATIBLE_SUFFIX)
}

/// Resolved provider configuration.
///
/// `model` is the model for the active provider: the Gemini model for
/// [`ProviderKind::Gemini`], the chat model for an OpenAI-compatible
/// Ollama endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfiguration {
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

impl ApiConfiguration {
    pub fn gemini(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Gemini,
            credential: Some(api_key.into()),
            model: model.into(),
            endpoint_url: None,
            verified: false,
        }
    }

    pub fn ollama(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Ollama,
            credential: None,
            model: model.into(),
            endpoint_url: Some(endpoint.into()),
            verified: false,
        }
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// Non-empty credential, if any.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Non-empty endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint_url.as_deref().filter(|e| !e.trim().is_empty())
    }

    pub fn is_openai_compatible(&self) -> bool {
        self.endpoint().is_some_and(is_openai_compatible)
    }

    /// The configuration error that blocks dispatch, if a provider-required
    /// field is missing.
    pub fn missing_requirement(&self) -> Option<ProviderError> {
        match self.provider {
            ProviderKind::Gemini if self.credential().is_none() => Some(ProviderError::MissingApiKey),
            ProviderKind::Ollama if self.endpoint().is_none() => Some(ProviderError::MissingEndpoint),
            _ => None,
        }
    }

    /// `verified` implies every provider-required field is present.
    pub fn satisfies_verified_invariant(&self) -> bool {
        if !self.verified {
            return true;
        }
        match self.provider {
            ProviderKind::Gemini => self.credential().is_some(),
            ProviderKind::Ollama => {
                self.endpoint().is_some()
                    && (!self.is_openai_compatible() || !self.model.trim().is_empty())
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
