//! Panel controller.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::{debug, error, info, trace};

use threadlens_config::settings::{is_config_verified, settings_map};
use threadlens_config::ProvidersConfig;
use threadlens_protocols::message::{ExtensionMessage, Reply, SummaryResultPayload};
use threadlens_protocols::messaging::{Envelope, TabMessenger};
use threadlens_protocols::settings::{keys, SettingsMap, SettingsStore};
use threadlens_protocols::types::{
    is_openai_compatible, ProviderKind, SummarizationResult, DEFAULT_PROMPT_TEMPLATE,
};
use threadlens_provider_gemini::GeminiClient;
use threadlens_provider_ollama::{OllamaAdapter, OllamaSettings};
use threadlens_runtime::Inbox;

use crate::error::PanelError;
use crate::render::SummaryContent;
use crate::state::{FormState, PanelView, StatusKind, StatusMessage, StatusSlot};

/// Reply to `processingComment`.
pub const PROCESSING_ACK_STATUS: &str = "processing state updated";

/// Reply to a displayed `summaryResult`.
pub const SUMMARY_ACK_STATUS: &str = "summary result displayed";

/// Reply to a `summaryResult` older than the request being shown.
pub const STALE_RESULT_STATUS: &str = "stale summary result ignored";

#[derive(Debug, Default)]
struct PanelState {
    form: FormState,
    view: PanelView,
    content: SummaryContent,
    latest_request: Option<u64>,
    statuses: HashMap<StatusSlot, StatusMessage>,
}

/// The side panel.
///
/// Connection tests talk to the provider directly; nothing here goes
/// through the coordinator except the summaries it broadcasts.
pub struct PanelController {
    store: Arc<dyn SettingsStore>,
    gemini: GeminiClient,
    ollama: OllamaAdapter,
    tabs: Arc<dyn TabMessenger>,
    state: Mutex<PanelState>,
}

fn text_value(values: &SettingsMap, key: &str) -> Option<String> {
    values
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl PanelController {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        providers: &ProvidersConfig,
        tabs: Arc<dyn TabMessenger>,
    ) -> Self {
        Self {
            store,
            gemini: GeminiClient::with_base_url(&providers.gemini.base_url),
            ollama: OllamaAdapter::new(OllamaSettings {
                default_openai_model: providers.ollama.default_openai_model.clone(),
                temperature: providers.ollama.temperature,
                max_tokens: providers.ollama.max_tokens,
            }),
            tabs,
            state: Mutex::new(PanelState::default()),
        }
    }

    pub fn form(&self) -> FormState {
        self.state.lock().form.clone()
    }

    pub fn view(&self) -> PanelView {
        self.state.lock().view
    }

    pub fn content(&self) -> SummaryContent {
        self.state.lock().content.clone()
    }

    /// Markup of the summary area.
    pub fn rendered_summary(&self) -> String {
        self.state.lock().content.render()
    }

    /// The status line of a form, while it is still visible.
    pub fn status(&self, slot: StatusSlot) -> Option<StatusMessage> {
        self.state
            .lock()
            .statuses
            .get(&slot)
            .filter(|s| s.is_visible())
            .cloned()
    }

    fn set_status(&self, slot: StatusSlot, text: impl Into<String>, kind: StatusKind) {
        self.state
            .lock()
            .statuses
            .insert(slot, StatusMessage::new(text, kind));
    }

    fn reject<T>(&self, slot: StatusSlot, err: PanelError) -> Result<T, PanelError> {
        self.set_status(slot, err.to_string(), StatusKind::Error);
        Err(err)
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.state.lock().form.api_key = api_key.into();
    }

    pub fn select_provider(&self, provider: ProviderKind) {
        self.state.lock().form.provider = provider;
    }

    pub fn select_model(&self, model: impl Into<String>) {
        self.state.lock().form.selected_model = Some(model.into());
    }

    pub fn set_ollama_endpoint(&self, endpoint: impl Into<String>) {
        self.state.lock().form.ollama_endpoint = endpoint.into();
    }

    pub fn set_openai_model(&self, model: impl Into<String>) {
        self.state.lock().form.openai_model = model.into();
    }

    pub fn set_prompt_template(&self, template: impl Into<String>) {
        self.state.lock().form.prompt_template = template.into();
    }

    /// Fill the forms from the settings store.
    pub async fn load_settings(&self) -> Result<(), PanelError> {
        let values = self
            .store
            .get(&[
                keys::API_PROVIDER,
                keys::GEMINI_API_KEY,
                keys::GEMINI_MODEL,
                keys::OLLAMA_ENDPOINT,
                keys::OPENAI_MODEL,
                keys::PROMPT_TEMPLATE,
                keys::ACTIVE_TAB,
            ])
            .await?;

        let mut state = self.state.lock();
        let form = &mut state.form;
        if let Some(api_key) = text_value(&values, keys::GEMINI_API_KEY) {
            form.api_key = api_key;
        }
        if let Some(endpoint) = text_value(&values, keys::OLLAMA_ENDPOINT) {
            form.ollama_endpoint = endpoint;
            if form.openai_section_visible() {
                if let Some(model) = text_value(&values, keys::OPENAI_MODEL) {
                    form.openai_model = model;
                }
            }
        }
        form.selected_model = text_value(&values, keys::GEMINI_MODEL);
        form.prompt_template = text_value(&values, keys::PROMPT_TEMPLATE)
            .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string());
        form.provider = text_value(&values, keys::API_PROVIDER)
            .and_then(|p| p.parse().ok())
            .unwrap_or_default();
        form.active_tab = text_value(&values, keys::ACTIVE_TAB);
        Ok(())
    }

    /// Pick the initial view. A stored key without a chosen model triggers
    /// a model probe. Returns whether the configuration is verified.
    pub async fn check_configuration(&self) -> Result<bool, PanelError> {
        let values = self
            .store
            .get(&[
                keys::GEMINI_API_KEY,
                keys::GEMINI_MODEL,
                keys::OLLAMA_ENDPOINT,
                keys::CONFIG_VERIFIED,
            ])
            .await?;

        let verified = values
            .get(keys::CONFIG_VERIFIED)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let probe_key = {
            let mut state = self.state.lock();
            if verified {
                state.view.show_summary();
                return Ok(true);
            }
            state.view.show_config();

            let api_key = text_value(&values, keys::GEMINI_API_KEY);
            if let Some(ref key) = api_key {
                state.form.api_key = key.clone();
            }
            if let Some(endpoint) = text_value(&values, keys::OLLAMA_ENDPOINT) {
                state.form.ollama_endpoint = endpoint;
            }
            api_key.filter(|_| text_value(&values, keys::GEMINI_MODEL).is_none())
        };

        if let Some(api_key) = probe_key {
            debug!("API key stored without a model, probing models");
            if let Err(e) = self.test_gemini_connection(&api_key).await {
                debug!("Automatic model probe failed: {}", e);
            }
        }
        Ok(false)
    }

    /// "Test" button of the Gemini form.
    pub async fn test_gemini(&self) -> Result<Vec<String>, PanelError> {
        let api_key = self.form().api_key.trim().to_string();
        if api_key.is_empty() {
            return self.reject(StatusSlot::Gemini, PanelError::MissingApiKey);
        }
        self.set_status(StatusSlot::Gemini, "Testing connection...", StatusKind::Info);
        self.test_gemini_connection(&api_key).await
    }

    /// Probe the key by listing models. On success the key is stored and
    /// the Gemini models become selectable.
    pub async fn test_gemini_connection(&self, api_key: &str) -> Result<Vec<String>, PanelError> {
        let list = match self.gemini.list_models(api_key).await {
            Ok(list) => list,
            Err(e) => {
                error!("Error testing Gemini API: {}", e);
                return self.reject(StatusSlot::Gemini, PanelError::Connection(e));
            }
        };

        self.set_status(StatusSlot::Gemini, "Connection successful!", StatusKind::Success);
        self.store
            .set(settings_map([
                (keys::GEMINI_API_KEY, json!(api_key)),
                (keys::API_PROVIDER, json!(ProviderKind::Gemini.as_str())),
            ]))
            .await?;

        let names = list.gemini_model_names();
        let mut state = self.state.lock();
        state.view.model_selection_visible = true;
        if !list.models.is_empty() {
            state.form.models = names.clone();
            state.form.selected_model = names.first().cloned();
        }
        info!("Gemini connection verified, {} models offered", names.len());
        Ok(names)
    }

    /// "Test" button of the Ollama form.
    pub async fn test_ollama(&self) -> Result<(), PanelError> {
        let endpoint = self.form().ollama_endpoint.trim().to_string();
        if endpoint.is_empty() {
            return self.reject(StatusSlot::Ollama, PanelError::MissingEndpoint);
        }
        self.set_status(StatusSlot::Ollama, "Testing connection...", StatusKind::Info);
        self.test_ollama_connection(&endpoint).await
    }

    /// Send the canned prompt to `endpoint`. Success stores the endpoint
    /// and marks the configuration verified.
    pub async fn test_ollama_connection(&self, endpoint: &str) -> Result<(), PanelError> {
        let model = self.form().openai_model.trim().to_string();
        if let Err(e) = self.ollama.test_connection(endpoint, &model).await {
            error!("Error testing Ollama API: {}", e);
            return self.reject(StatusSlot::Ollama, PanelError::Connection(e));
        }

        self.set_status(StatusSlot::Ollama, "Connection successful!", StatusKind::Success);
        self.store
            .set(settings_map([
                (keys::OLLAMA_ENDPOINT, json!(endpoint)),
                (keys::API_PROVIDER, json!(ProviderKind::Ollama.as_str())),
                (keys::CONFIG_VERIFIED, json!(true)),
            ]))
            .await?;
        self.state.lock().view.show_summary();
        info!("Ollama connection verified: {}", endpoint);
        Ok(())
    }

    pub async fn save_gemini_config(&self) -> Result<(), PanelError> {
        let form = self.form();
        let api_key = form.api_key.trim();
        if api_key.is_empty() {
            return self.reject(StatusSlot::Gemini, PanelError::MissingApiKey);
        }
        let Some(model) = form.selected_model.as_deref().filter(|m| !m.is_empty()) else {
            return self.reject(StatusSlot::Gemini, PanelError::MissingModel);
        };

        self.store
            .set(settings_map([
                (keys::GEMINI_API_KEY, json!(api_key)),
                (keys::GEMINI_MODEL, json!(model)),
                (keys::API_PROVIDER, json!(ProviderKind::Gemini.as_str())),
                (keys::CONFIG_VERIFIED, json!(true)),
            ]))
            .await?;

        self.set_status(StatusSlot::Gemini, "Configuration saved!", StatusKind::Success);
        self.state.lock().view.show_summary();
        Ok(())
    }

    /// Save the Ollama form. An OpenAI-compatible endpoint needs a model
    /// name and is stored before testing; a native endpoint is only stored
    /// by a passing test.
    pub async fn save_ollama_config(&self) -> Result<(), PanelError> {
        let form = self.form();
        let endpoint = form.ollama_endpoint.trim();
        if endpoint.is_empty() {
            return self.reject(StatusSlot::Ollama, PanelError::MissingEndpoint);
        }

        if is_openai_compatible(endpoint) {
            let model = form.openai_model.trim();
            if model.is_empty() {
                return self.reject(StatusSlot::Ollama, PanelError::MissingOpenAiModel);
            }
            self.store
                .set(settings_map([
                    (keys::OLLAMA_ENDPOINT, json!(endpoint)),
                    (keys::OPENAI_MODEL, json!(model)),
                    (keys::API_PROVIDER, json!(ProviderKind::Ollama.as_str())),
                    (keys::CONFIG_VERIFIED, json!(true)),
                ]))
                .await?;
            self.set_status(StatusSlot::Ollama, "Configuration saved!", StatusKind::Success);
        }

        self.test_ollama_connection(endpoint).await
    }

    pub async fn save_prompt(&self) -> Result<(), PanelError> {
        let template = self.form().prompt_template.trim().to_string();
        if template.is_empty() {
            return self.reject(StatusSlot::Prompt, PanelError::EmptyPrompt);
        }

        self.store
            .set(settings_map([(keys::PROMPT_TEMPLATE, json!(template))]))
            .await?;
        self.state.lock().form.prompt_template = template;
        self.set_status(
            StatusSlot::Prompt,
            "Prompt template saved successfully",
            StatusKind::Success,
        );
        Ok(())
    }

    /// Settings icon: show both configuration sections, or hide them and
    /// return to the summary when the configuration is verified.
    pub async fn toggle_settings(&self) -> Result<PanelView, PanelError> {
        let open = {
            let view = self.state.lock().view;
            view.config_visible && view.prompt_visible
        };

        let verified = if open {
            is_config_verified(self.store.as_ref()).await?
        } else {
            false
        };

        let mut state = self.state.lock();
        if open {
            state.view.config_visible = false;
            state.view.prompt_visible = false;
            if verified {
                state.view.summary_visible = true;
            }
        } else {
            state.view.config_visible = true;
            state.view.prompt_visible = true;
            state.view.summary_visible = false;
        }
        Ok(state.view)
    }

    /// Persist the selected panel tab.
    pub async fn select_tab(&self, tab: &str) -> Result<(), PanelError> {
        self.store
            .set(settings_map([(keys::ACTIVE_TAB, json!(tab))]))
            .await?;
        self.state.lock().form.active_tab = Some(tab.to_string());
        Ok(())
    }

    /// Answer a broadcast from the coordinator.
    pub fn handle_message(&self, envelope: Envelope) {
        match envelope.message {
            ExtensionMessage::ProcessingComment(ref processing) => {
                {
                    let mut state = self.state.lock();
                    if let Some(id) = processing.request_id {
                        state.latest_request = Some(state.latest_request.map_or(id, |l| l.max(id)));
                    }
                    state.content = SummaryContent::Loading;
                }
                envelope.respond(Reply::status(PROCESSING_ACK_STATUS));
            }
            ExtensionMessage::SummaryResult(ref result) => {
                let status = if self.show_result(result) {
                    SUMMARY_ACK_STATUS
                } else {
                    STALE_RESULT_STATUS
                };
                envelope.respond(Reply::status(status));
            }
            ref other => trace!("Panel ignoring {}", other.action()),
        }
    }

    fn show_result(&self, payload: &SummaryResultPayload) -> bool {
        let mut state = self.state.lock();
        if let (Some(id), Some(latest)) = (payload.request_id, state.latest_request) {
            if id < latest {
                debug!("Dropping result {} superseded by {}", id, latest);
                return false;
            }
        }

        state.content = match payload.result() {
            SummarizationResult::Success { summary } => SummaryContent::Summary {
                original_comment: payload.original_comment.clone().unwrap_or_default(),
                summary,
            },
            SummarizationResult::Failure { error_message } => SummaryContent::Error {
                message: error_message,
            },
        };
        true
    }

    /// Ask the active tab to scroll to the thread behind the shown summary.
    pub async fn focus_original(&self) -> Result<bool, PanelError> {
        let original = self
            .state
            .lock()
            .content
            .original_comment()
            .map(str::to_string)
            .ok_or(PanelError::NothingToFocus)?;
        let tab = self.tabs.active_tab().ok_or(PanelError::NoActiveTab)?;

        let reply = self
            .tabs
            .send_to_tab(tab.id, ExtensionMessage::focus_on_comment(original))?
            .recv()
            .await?;

        let found = matches!(reply, Reply::Focus { success: true, .. });
        debug!("Focus request on tab {} answered: {}", tab.id, found);
        Ok(found)
    }

    /// Serve the inbox until the panel is closed.
    pub async fn run(self: Arc<Self>, mut inbox: Inbox) {
        info!("Panel started");
        while let Some(envelope) = inbox.recv().await {
            self.handle_message(envelope);
        }
        info!("Panel closed");
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
