//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Host site the content script runs on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_match_pattern")]
    pub match_pattern: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            match_pattern: default_match_pattern(),
        }
    }
}

fn default_match_pattern() -> String {
    "https://docs.google.com/document/*".to_string()
}

/// Content script timing and retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Delay after page load before listeners are first attached.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Safety-net rescan interval.
    #[serde(default = "default_rescan_interval_ms")]
    pub rescan_interval_ms: u64,

    /// Quiet period that coalesces bursts of DOM mutations into one rescan.
    #[serde(default = "default_mutation_debounce_ms")]
    pub mutation_debounce_ms: u64,

    /// Delay between readiness pings while the coordinator is unreachable.
    #[serde(default = "default_ready_check_interval_ms")]
    pub ready_check_interval_ms: u64,

    /// Consecutive channel failures tolerated before a reload is required.
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,

    /// Characters of the stored comment used to locate it again.
    #[serde(default = "default_focus_prefix_chars")]
    pub focus_prefix_chars: usize,

    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            rescan_interval_ms: default_rescan_interval_ms(),
            mutation_debounce_ms: default_mutation_debounce_ms(),
            ready_check_interval_ms: default_ready_check_interval_ms(),
            retry_budget: default_retry_budget(),
            focus_prefix_chars: default_focus_prefix_chars(),
            highlight_ms: default_highlight_ms(),
        }
    }
}

impl ContentConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn rescan_interval(&self) -> Duration {
        Duration::from_millis(self.rescan_interval_ms)
    }

    pub fn mutation_debounce(&self) -> Duration {
        Duration::from_millis(self.mutation_debounce_ms)
    }

    pub fn ready_check_interval(&self) -> Duration {
        Duration::from_millis(self.ready_check_interval_ms)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

fn default_initial_delay_ms() -> u64 {
    2000
}

fn default_rescan_interval_ms() -> u64 {
    5000
}

fn default_mutation_debounce_ms() -> u64 {
    250
}

fn default_ready_check_interval_ms() -> u64 {
    3000
}

fn default_retry_budget() -> u32 {
    2
}

fn default_focus_prefix_chars() -> usize {
    50
}

fn default_highlight_ms() -> u64 {
    2000
}

/// Provider endpoints and generation parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_gemini_model")]
    pub default_model: String,

    #[serde(default = "default_gemini_temperature")]
    pub temperature: f32,

    #[serde(default = "default_gemini_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            default_model: default_gemini_model(),
            temperature: default_gemini_temperature(),
            max_output_tokens: default_gemini_max_output_tokens(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_temperature() -> f32 {
    0.2
}

fn default_gemini_max_output_tokens() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Chat model used against `/v1` endpoints when none is stored.
    #[serde(default = "default_openai_model")]
    pub default_openai_model: String,

    #[serde(default = "default_ollama_temperature")]
    pub temperature: f32,

    #[serde(default = "default_ollama_max_tokens")]
    pub max_tokens: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            default_openai_model: default_openai_model(),
            temperature: default_ollama_temperature(),
            max_tokens: default_ollama_max_tokens(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4".to_string()
}

fn default_ollama_temperature() -> f32 {
    0.7
}

fn default_ollama_max_tokens() -> u32 {
    150
}

/// Where the persistent settings live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
        }
    }
}

impl StorageConfig {
    /// Settings path with `~` expanded.
    pub fn resolved_settings_path(&self) -> PathBuf {
        PathBuf::from(crate::ConfigLoader::expand_path(&self.settings_path))
    }
}

fn default_settings_path() -> String {
    "~/.threadlens/settings.json".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
