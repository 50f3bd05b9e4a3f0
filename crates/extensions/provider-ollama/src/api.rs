//! Wire types for both endpoint protocols.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use threadlens_protocols::error::ProviderError;
use threadlens_protocols::types::is_openai_compatible;

/// Protocol spoken by an endpoint, chosen by its `/v1` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// `POST {endpoint}/chat/completions`
    OpenAiChat,
    /// `POST {endpoint}/api/generate`
    Native,
}

impl Protocol {
    pub fn for_endpoint(endpoint: &str) -> Self {
        if is_openai_compatible(endpoint) {
            Self::OpenAiChat
        } else {
            Self::Native
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        match self {
            Self::OpenAiChat => format!("{}/chat/completions", endpoint),
            Self::Native => format!("{}/api/generate", endpoint),
        }
    }
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// OpenAI-compatible chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Native completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub stream: bool,
}

/// Request body for either protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OllamaRequest {
    Chat(ChatRequest),
    Generate(GenerateRequest),
}

impl OllamaRequest {
    pub fn protocol(&self) -> Protocol {
        match self {
            Self::Chat(_) => Protocol::OpenAiChat,
            Self::Generate(_) => Protocol::Native,
        }
    }
}

/// Chat response message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub annotations: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub text: Option<String>,
}

/// OpenAI-compatible chat completion response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

impl ChatResponse {
    fn first(&self) -> Option<&Choice> {
        self.choices.as_ref()?.first()
    }

    fn content(&self) -> Option<&str> {
        self.first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .filter(|c| !c.is_empty())
    }

    fn has_annotations(&self) -> bool {
        self.first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.annotations.as_ref())
            .is_some_and(|a| !a.is_null())
    }

    fn text(&self) -> Option<&str> {
        self.first()?.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Summary text in priority order: message content, then (for replies
    /// carrying annotations) the possibly empty message content, then the
    /// legacy completion `text`.
    pub fn summary(&self) -> Option<String> {
        if let Some(content) = self.content() {
            return Some(content.trim().to_string());
        }
        if self.has_annotations() {
            let content = self
                .first()
                .and_then(|c| c.message.as_ref())
                .and_then(|m| m.content.as_deref())
                .unwrap_or_default();
            return Some(content.trim().to_string());
        }
        self.text().map(|t| t.trim().to_string())
    }

    /// Whether a connection test reply looks like a completion.
    pub fn is_completion(&self) -> bool {
        self.content().is_some() || self.text().is_some()
    }
}

/// Native completion response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}

/// Pull the summary out of a parsed body.
pub fn extract_summary(protocol: Protocol, body: &Value) -> Result<String, ProviderError> {
    let summary = match protocol {
        Protocol::OpenAiChat => ChatResponse::deserialize(body)
            .ok()
            .and_then(|r| r.summary()),
        Protocol::Native => GenerateResponse::deserialize(body)
            .ok()
            .and_then(|r| r.response)
            .map(|r| r.trim().to_string()),
    };
    summary.ok_or(ProviderError::UnexpectedFormat)
}

/// Whether a parsed connection-test body indicates a working endpoint.
pub fn is_successful_reply(protocol: Protocol, body: &Value) -> bool {
    match protocol {
        Protocol::OpenAiChat => ChatResponse::deserialize(body)
            .map(|r| r.is_completion())
            .unwrap_or(false),
        Protocol::Native => GenerateResponse::deserialize(body)
            .map(|r| r.response.is_some())
            .unwrap_or(false),
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
