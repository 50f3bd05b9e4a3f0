//! Comment threads, summarization requests and their results.

use serde::{Deserialize, Serialize};

use super::ApiConfiguration;

/// Prompt seeded into the settings store on install.
pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "Summarize this Google Docs comment concisely, focusing on the main point or question:";

/// Prompt the adapters fall back to when the stored template is empty.
pub const FALLBACK_PROMPT_TEMPLATE: &str =
    "Summarize this Google Docs comment thread concisely, focusing on the main points and questions:";

/// One comment inside a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub author: String,
    pub body: String,
}

/// Comments of one thread, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentThread {
    pub entries: Vec<CommentEntry>,
}

impl CommentThread {
    pub fn push(&mut self, author: impl Into<String>, body: impl Into<String>) {
        self.entries.push(CommentEntry {
            author: author.into(),
            body: body.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `author: body` lines separated by a blank line.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.author, e.body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Everything an adapter needs for one summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizationRequest {
    pub comment_text: String,
    pub prompt_template: String,
    pub provider_config: ApiConfiguration,
}

impl SummarizationRequest {
    pub fn new(
        comment_text: impl Into<String>,
        prompt_template: impl Into<String>,
        provider_config: ApiConfiguration,
    ) -> Self {
        Self {
            comment_text: comment_text.into(),
            prompt_template: prompt_template.into(),
            provider_config,
        }
    }

    /// The stored template, or the fallback when it is blank.
    pub fn effective_prompt(&self) -> &str {
        if self.prompt_template.trim().is_empty() {
            FALLBACK_PROMPT_TEMPLATE
        } else {
            &self.prompt_template
        }
    }
}

/// Outcome of a summarization; adapters never fail any other way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizationResult {
    Success { summary: String },
    Failure { error_message: String },
}

impl SummarizationResult {
    pub fn success(summary: impl Into<String>) -> Self {
        Self::Success {
            summary: summary.into(),
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self::Failure {
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl<E: std::error::Error> From<Result<String, E>> for SummarizationResult {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(summary) => Self::success(summary),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
