//! Form, view and status state of the panel.

use tokio::time::{Duration, Instant};

use threadlens_protocols::types::{is_openai_compatible, ProviderKind};

/// How long a status message stays on a form.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Contents of the configuration forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub provider: ProviderKind,
    pub api_key: String,
    /// Models offered by the last successful Gemini probe.
    pub models: Vec<String>,
    pub selected_model: Option<String>,
    pub ollama_endpoint: String,
    pub openai_model: String,
    pub prompt_template: String,
    pub active_tab: Option<String>,
}

impl FormState {
    /// The chat-model field only applies to OpenAI-compatible endpoints.
    pub fn openai_section_visible(&self) -> bool {
        is_openai_compatible(self.ollama_endpoint.trim())
    }
}

/// Which sections of the panel are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelView {
    pub config_visible: bool,
    pub prompt_visible: bool,
    pub summary_visible: bool,
    pub model_selection_visible: bool,
}

impl Default for PanelView {
    fn default() -> Self {
        Self {
            config_visible: true,
            prompt_visible: false,
            summary_visible: false,
            model_selection_visible: false,
        }
    }
}

impl PanelView {
    pub(crate) fn show_summary(&mut self) {
        self.config_visible = false;
        self.summary_visible = true;
    }

    pub(crate) fn show_config(&mut self) {
        self.config_visible = true;
        self.summary_visible = false;
    }
}

/// Forms that carry their own status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusSlot {
    Gemini,
    Ollama,
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// A transient status line.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub shown_at: Instant,
}

impl StatusMessage {
    pub(crate) fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.shown_at.elapsed() < STATUS_TTL
    }
}
