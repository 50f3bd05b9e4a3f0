//! Panel errors.
//!
//! The display text of each validation variant is what the form shows.

use thiserror::Error;

use threadlens_protocols::error::{ChannelError, ProviderError, SettingsError};

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Please enter an API Key")]
    MissingApiKey,

    #[error("Please select a model")]
    MissingModel,

    #[error("Please enter an endpoint URL")]
    MissingEndpoint,

    #[error("Please enter a model name for OpenAI-compatible endpoint")]
    MissingOpenAiModel,

    #[error("Please enter a prompt template")]
    EmptyPrompt,

    #[error("Connection failed: {0}")]
    Connection(#[from] ProviderError),

    #[error("No summarized comment to focus")]
    NothingToFocus,

    #[error("No active host-page tab")]
    NoActiveTab,

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl PanelError {
    /// Whether this is a form validation failure, caught before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey
                | Self::MissingModel
                | Self::MissingEndpoint
                | Self::MissingOpenAiModel
                | Self::EmptyPrompt
        )
    }
}
