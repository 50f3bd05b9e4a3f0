//! Background coordinator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, trace, warn};

use threadlens_config::{
    is_config_verified, load_api_configuration, load_prompt_template, seed_install_defaults,
    AppConfig,
};
use threadlens_protocols::error::ProviderError;
use threadlens_protocols::message::{ExtensionMessage, ProcessingComment, Reply, SummaryResultPayload};
use threadlens_protocols::messaging::{Envelope, RuntimeMessenger, TabMessenger};
use threadlens_protocols::settings::{SettingsChange, SettingsStore};
use threadlens_protocols::types::{SummarizationRequest, SummarizationResult};
use threadlens_runtime::{ContextHandle, Inbox};

use crate::error::CoordinatorError;
use crate::registry::ProviderRegistry;

/// Reply to `commentClicked`: the click was accepted, the result follows
/// as a separate `summaryResult` broadcast.
pub const ACK_STATUS: &str = "received and processing";

/// Reply to `ping`.
pub const READY_STATUS: &str = "ready";

/// Text of the `settingsChanged` notification sent to host-page tabs.
pub const SETTINGS_CHANGED_MESSAGE: &str =
    "ThreadLens settings changed. Reload the page if summaries stop working.";

/// The background context.
pub struct Coordinator {
    config: AppConfig,
    store: Arc<dyn SettingsStore>,
    providers: ProviderRegistry,
    runtime: Arc<dyn RuntimeMessenger>,
    tabs: Arc<dyn TabMessenger>,
    next_request_id: AtomicU64,
}

impl Coordinator {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn SettingsStore>,
        providers: ProviderRegistry,
        handle: ContextHandle,
    ) -> Self {
        Self::with_messengers(
            config,
            store,
            providers,
            Arc::new(handle.clone()),
            Arc::new(handle),
        )
    }

    pub fn with_messengers(
        config: AppConfig,
        store: Arc<dyn SettingsStore>,
        providers: ProviderRegistry,
        runtime: Arc<dyn RuntimeMessenger>,
        tabs: Arc<dyn TabMessenger>,
    ) -> Self {
        Self {
            config,
            store,
            providers,
            runtime,
            tabs,
            next_request_id: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Install hook: seed defaults without overwriting stored values.
    pub async fn on_installed(&self) -> Result<Vec<&'static str>, CoordinatorError> {
        Ok(seed_install_defaults(self.store.as_ref()).await?)
    }

    /// Serve the inbox until every sender is gone, watching settings
    /// changes alongside.
    pub async fn run(self: Arc<Self>, mut inbox: Inbox) {
        let changes = self.store.subscribe();
        let watcher = tokio::spawn(Arc::clone(&self).watch_settings(changes));

        info!("Coordinator started");
        while let Some(envelope) = inbox.recv().await {
            self.handle_message(envelope);
        }

        watcher.abort();
        info!("Coordinator inbox closed");
    }

    /// Answer one delivered message. Summarization runs on its own task so
    /// the sender gets its acknowledgement immediately.
    pub fn handle_message(self: &Arc<Self>, envelope: Envelope) {
        match envelope.message {
            ExtensionMessage::CommentClicked(ref clicked) => {
                let comment_text = clicked.comment_text.clone();
                debug!("Background received comment text: {}", comment_text);
                envelope.respond(Reply::status(ACK_STATUS));

                let this = Arc::clone(self);
                tokio::spawn(async move {
                    this.process_comment(comment_text).await;
                });
            }
            ExtensionMessage::Ping => envelope.respond(Reply::status(READY_STATUS)),
            ref other => trace!("Coordinator ignoring {}", other.action()),
        }
    }

    /// Run one click through notify, gate, dispatch, invoke and broadcast.
    pub async fn process_comment(&self, comment_text: String) -> SummaryResultPayload {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed) + 1;

        self.broadcast(ExtensionMessage::ProcessingComment(ProcessingComment {
            comment_text: comment_text.clone(),
            request_id: Some(request_id),
        }));

        let result = match self.dispatch(&comment_text).await {
            Ok(result) => result,
            Err(e) => {
                error!("Summarization {} failed before dispatch: {}", request_id, e);
                SummarizationResult::failure(e.to_string())
            }
        };

        let payload = SummaryResultPayload::new(result, comment_text, Some(request_id));
        self.broadcast(ExtensionMessage::SummaryResult(payload.clone()));
        payload
    }

    async fn dispatch(&self, comment_text: &str) -> Result<SummarizationResult, CoordinatorError> {
        let store = self.store.as_ref();

        if !is_config_verified(store).await? {
            warn!("Summarization refused: configuration not verified");
            return Ok(SummarizationResult::failure(
                ProviderError::NotConfigured.to_string(),
            ));
        }

        let api_config = load_api_configuration(store, &self.config.providers).await?;
        let prompt_template = load_prompt_template(store).await?;

        if let Some(missing) = api_config.missing_requirement() {
            warn!("Summarization refused for {}: {}", api_config.provider, missing);
            return Ok(SummarizationResult::failure(missing.to_string()));
        }

        let provider = self
            .providers
            .get(api_config.provider)
            .ok_or(CoordinatorError::ProviderNotFound(api_config.provider))?;

        info!("Dispatching summarization to {}", api_config.provider);
        let request = SummarizationRequest::new(comment_text, prompt_template, api_config);
        Ok(provider.summarize(&request).await)
    }

    /// Fire-and-forget broadcast to the other extension contexts.
    fn broadcast(&self, message: ExtensionMessage) {
        let action = message.action();
        match self.runtime.send_message(message) {
            Ok(pending) => debug!("Broadcast {} to {} context(s)", action, pending.receivers()),
            Err(e) => debug!("Broadcast {} not delivered: {}", action, e),
        }
    }

    /// Forward provider-relevant settings changes to host-page tabs until
    /// the store goes away.
    pub async fn watch_settings(self: Arc<Self>, mut changes: broadcast::Receiver<SettingsChange>) {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    if !change.affects_provider() {
                        trace!("Settings change to {} ignored", change.key);
                        continue;
                    }
                    debug!("Provider setting {} changed", change.key);
                    // One write emits one change per key; notify once.
                    while changes.try_recv().is_ok() {}
                    self.notify_settings_changed();
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Settings watcher lagged by {} changes", skipped);
                    self.notify_settings_changed();
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Send `settingsChanged` to every matching tab. A tab without a live
    /// content script is skipped. Returns the number of tabs reached.
    pub fn notify_settings_changed(&self) -> usize {
        let tabs = self.tabs.query_tabs(&self.config.site.match_pattern);
        let mut delivered = 0;

        for tab in &tabs {
            match self
                .tabs
                .send_to_tab(tab.id, ExtensionMessage::settings_changed(SETTINGS_CHANGED_MESSAGE))
            {
                Ok(_) => delivered += 1,
                Err(e) => debug!("Could not notify tab {} ({}): {}", tab.id, tab.url, e),
            }
        }

        info!(
            "Notified {}/{} tab(s) of settings change",
            delivered,
            tabs.len()
        );
        delivered
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
