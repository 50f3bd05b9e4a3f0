//! Inter-context message contract.
//!
//! Every message is a JSON object tagged by its `action` field, matching the
//! shape the browser runtime carries between the content script, the
//! background coordinator and the panel.

use serde::{Deserialize, Serialize};

use crate::types::SummarizationResult;

/// Top-level message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionMessage {
    /// content -> background
    CommentClicked(CommentClicked),
    /// background -> panel
    ProcessingComment(ProcessingComment),
    /// background -> panel
    SummaryResult(SummaryResultPayload),
    /// background -> content
    SettingsChanged(SettingsChanged),
    /// panel -> content
    FocusOnComment(FocusOnComment),
    /// content -> background, readiness check only
    Ping,
}

impl ExtensionMessage {
    pub fn comment_clicked(comment_text: impl Into<String>) -> Self {
        Self::CommentClicked(CommentClicked {
            comment_text: comment_text.into(),
        })
    }

    pub fn focus_on_comment(comment_text: impl Into<String>) -> Self {
        Self::FocusOnComment(FocusOnComment {
            comment_text: comment_text.into(),
        })
    }

    pub fn settings_changed(message: impl Into<String>) -> Self {
        Self::SettingsChanged(SettingsChanged {
            message: message.into(),
        })
    }

    /// The `action` tag, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Self::CommentClicked(_) => "commentClicked",
            Self::ProcessingComment(_) => "processingComment",
            Self::SummaryResult(_) => "summaryResult",
            Self::SettingsChanged(_) => "settingsChanged",
            Self::FocusOnComment(_) => "focusOnComment",
            Self::Ping => "ping",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentClicked {
    pub comment_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingComment {
    pub comment_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
}

/// A summarization outcome paired with the text it summarizes.
///
/// Exactly one of `summary` / `error` is set, according to `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResultPayload {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, alias = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
}

impl SummaryResultPayload {
    pub fn new(
        result: SummarizationResult,
        original_comment: impl Into<String>,
        request_id: Option<u64>,
    ) -> Self {
        let (success, summary, error) = match result {
            SummarizationResult::Success { summary } => (true, Some(summary), None),
            SummarizationResult::Failure { error_message } => (false, None, Some(error_message)),
        };
        Self {
            success,
            summary,
            error,
            original_comment: Some(original_comment.into()),
            request_id,
        }
    }

    pub fn result(&self) -> SummarizationResult {
        if self.success {
            SummarizationResult::success(self.summary.clone().unwrap_or_default())
        } else {
            SummarizationResult::failure(
                self.error
                    .clone()
                    .unwrap_or_else(|| "Unknown error occurred".to_string()),
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChanged {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusOnComment {
    pub comment_text: String,
}

/// Response sent back through a message's reply channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Focus {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Status {
        status: String,
    },
}

impl Reply {
    pub fn status(status: impl Into<String>) -> Self {
        Self::Status {
            status: status.into(),
        }
    }

    pub fn focus(success: bool) -> Self {
        Self::Focus {
            success,
            error: None,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
