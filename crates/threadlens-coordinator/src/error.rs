//! Coordinator errors.

use thiserror::Error;

use threadlens_protocols::error::SettingsError;
use threadlens_protocols::types::ProviderKind;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("No provider registered for: {0}")]
    ProviderNotFound(ProviderKind),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
