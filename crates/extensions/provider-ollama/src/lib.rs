//! # ThreadLens Provider - Ollama
//!
//! Summary provider for a user-supplied, self-hosted endpoint. An endpoint
//! ending in `/v1` speaks the OpenAI-compatible chat protocol; anything
//! else speaks Ollama's native `/api/generate` protocol.

mod api;
mod client;
mod provider;

pub use api::*;
pub use client::{OllamaClient, CONNECTION_TEST_PROMPT};
pub use provider::{sanitize, OllamaAdapter, OllamaSettings};
