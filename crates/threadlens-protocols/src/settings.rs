//! Settings store protocol.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::SettingsError;

/// Key/value snapshot read from or written to a store.
pub type SettingsMap = serde_json::Map<String, Value>;

/// Persistent settings keys.
pub mod keys {
    pub const API_PROVIDER: &str = "apiProvider";
    pub const GEMINI_API_KEY: &str = "geminiApiKey";
    pub const GEMINI_MODEL: &str = "geminiModel";
    pub const OLLAMA_ENDPOINT: &str = "ollamaEndpoint";
    pub const OPENAI_MODEL: &str = "openaiModel";
    pub const PROMPT_TEMPLATE: &str = "promptTemplate";
    pub const CONFIG_VERIFIED: &str = "configVerified";
    pub const ACTIVE_TAB: &str = "activeTab";

    /// Keys that determine which provider is called and with what credentials.
    pub const PROVIDER_KEYS: &[&str] = &[
        API_PROVIDER,
        GEMINI_API_KEY,
        GEMINI_MODEL,
        OLLAMA_ENDPOINT,
        OPENAI_MODEL,
        CONFIG_VERIFIED,
    ];
}

/// A single key write observed on a store.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsChange {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

impl SettingsChange {
    pub fn affects_provider(&self) -> bool {
        keys::PROVIDER_KEYS.contains(&self.key.as_str())
    }
}

/// Persistent key-value store with change notification.
///
/// There is no transactional guarantee: concurrent writers win per key in
/// write order.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the given keys; absent keys are omitted from the result.
    async fn get(&self, keys: &[&str]) -> Result<SettingsMap, SettingsError>;

    /// Write every entry of `values`, emitting one change per key whose
    /// value actually changed.
    async fn set(&self, values: SettingsMap) -> Result<(), SettingsError>;

    /// Subscribe to change events.
    fn subscribe(&self) -> broadcast::Receiver<SettingsChange>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_keys_affect_provider() {
        let change = SettingsChange {
            key: keys::GEMINI_API_KEY.to_string(),
            old_value: None,
            new_value: Some(Value::from("k")),
        };
        assert!(change.affects_provider());
    }

    #[test]
    fn test_ui_keys_do_not_affect_provider() {
        for key in [keys::ACTIVE_TAB, keys::PROMPT_TEMPLATE] {
            let change = SettingsChange {
                key: key.to_string(),
                old_value: None,
                new_value: Some(Value::from("x")),
            };
            assert!(!change.affects_provider(), "{} should not trigger fan-out", key);
        }
    }
}
