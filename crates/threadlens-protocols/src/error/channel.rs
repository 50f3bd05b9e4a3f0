//! Message substrate errors.
//!
//! These describe a failure of delivery between contexts, never a failure
//! of the summarization request itself.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Could not establish connection. Receiving end does not exist.")]
    NoReceiver,

    #[error("Extension context invalidated.")]
    ContextInvalidated,

    #[error("The message port closed before a response was received.")]
    PortClosed,

    #[error("No tab with id: {0}")]
    TabNotFound(u32),
}

impl ChannelError {
    /// Whether the sending context can never recover without a page reload.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::ContextInvalidated)
    }
}
