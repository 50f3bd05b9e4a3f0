//! Summary provider protocol.
//!
//! Providers turn comment text into a summary by calling an LLM backend.
//! They share one result contract so the coordinator and panel need no
//! provider-specific branching beyond the initial dispatch.

use async_trait::async_trait;

use crate::types::{ProviderKind, SummarizationRequest, SummarizationResult};

/// Core trait for summarization backends.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// The provider this adapter serves.
    fn kind(&self) -> ProviderKind;

    /// Summarize the request's comment text.
    ///
    /// Never fails: every error resolves to [`SummarizationResult::Failure`].
    async fn summarize(&self, request: &SummarizationRequest) -> SummarizationResult;
}
