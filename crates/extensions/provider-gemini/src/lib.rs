//! # ThreadLens Provider - Gemini
//!
//! Google Gemini summary provider: single-turn `generateContent` calls
//! keyed by an API key, plus the model-listing probe used to validate keys.

mod client;
mod provider;
mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL};
pub use provider::{GeminiAdapter, GeminiSettings};
pub use types::*;
