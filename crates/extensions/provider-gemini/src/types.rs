//! Gemini API types.

use serde::{Deserialize, Serialize};

/// A text part of a content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Request content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// `generateContent` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// A single-turn request for `text`.
    pub fn single_turn(text: impl Into<String>, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: text.into() }],
            }],
            generation_config,
        }
    }
}

/// Response part. Every field is optional so that shape mismatches are
/// reported as a format error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// `generateContent` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, when present and non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiError {
    #[serde(default)]
    pub error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
}

impl GeminiError {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()?
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
    }
}

/// One entry of the model listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// `GET /models` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

impl ModelList {
    /// Short names (`models/gemini-pro` -> `gemini-pro`) of Gemini models.
    pub fn gemini_model_names(&self) -> Vec<String> {
        self.models
            .iter()
            .filter(|m| m.name.contains("gemini"))
            .map(|m| m.name.rsplit('/').next().unwrap_or(&m.name).to_string())
            .collect()
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
