//! Summarization errors.
//!
//! Every variant is terminal for the user action that triggered it; nothing
//! here is retried automatically.

use thiserror::Error;

/// Coarse classification of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not configured, or a provider-required field is missing.
    Configuration,
    /// HTTP failure, unreadable or empty body, malformed JSON.
    Transport,
    /// The body parsed but lacked the expected fields.
    Format,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("API not configured. Please configure your API settings first.")]
    NotConfigured,

    #[error("No Gemini API key found. Please configure your API settings.")]
    MissingApiKey,

    #[error("Ollama configuration incomplete. Please configure your API settings.")]
    MissingEndpoint,

    #[error("API Error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read API response: {0}")]
    Read(String),

    #[error("Empty response from server")]
    EmptyResponse,

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("Unexpected API response format")]
    UnexpectedFormat,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured | Self::MissingApiKey | Self::MissingEndpoint => {
                ErrorKind::Configuration
            }
            Self::Api(_) | Self::Network(_) | Self::Read(_) | Self::EmptyResponse | Self::Parse(_) => {
                ErrorKind::Transport
            }
            Self::UnexpectedFormat => ErrorKind::Format,
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
