//! The content script proper.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, Instant};
use tracing::{debug, info, trace, warn};

use ego_tree::NodeId;
use threadlens_config::ContentConfig;
use threadlens_protocols::error::ChannelError;
use threadlens_protocols::message::{ExtensionMessage, Reply};
use threadlens_protocols::messaging::{Envelope, RuntimeMessenger};
use threadlens_runtime::Inbox;

use crate::extract::{ClickPath, Extractor};
use crate::page::{BannerKind, HostPage, PageEvent};
use crate::session::{ClickAction, FailureAction, SessionState};

pub const RETRY_BANNER_TEXT: &str =
    "ThreadLens is reconnecting to the extension. Please click the comment again.";

pub const RELOAD_BANNER_TEXT: &str =
    "ThreadLens lost its connection to the extension. Click any comment to reload the page.";

/// Reply to `settingsChanged`.
pub const SETTINGS_ACK_STATUS: &str = "settings change noted";

/// Result of one click as seen by the content script.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Not on a comment, or listeners are not installed yet.
    Ignored,
    /// Sent to the coordinator, which acknowledged it.
    Sent { path: ClickPath, reply: Reply },
    /// The channel failed; the session decided what to show.
    Failed {
        error: ChannelError,
        action: FailureAction,
    },
    /// The session was not ready, so the page was reloaded instead.
    Reloaded,
}

/// Content script bound to one host page.
pub struct ContentScript {
    page: Rc<RefCell<HostPage>>,
    extractor: Extractor,
    session: RefCell<SessionState>,
    port: Box<dyn RuntimeMessenger>,
    config: ContentConfig,
    installed: Cell<bool>,
}

impl ContentScript {
    pub fn new(
        page: Rc<RefCell<HostPage>>,
        port: impl RuntimeMessenger + 'static,
        config: ContentConfig,
    ) -> Self {
        Self {
            page,
            extractor: Extractor::new(),
            session: RefCell::new(SessionState::new(config.retry_budget)),
            port: Box::new(port),
            config,
            installed: Cell::new(false),
        }
    }

    pub fn page(&self) -> &Rc<RefCell<HostPage>> {
        &self.page
    }

    pub fn session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    pub fn is_installed(&self) -> bool {
        self.installed.get()
    }

    /// Turn on click handling and run the first listener scan.
    pub fn install(&self) -> usize {
        info!("Setting up comment listeners on {}", self.page.borrow().url());
        self.installed.set(true);
        self.rescan()
    }

    /// Attach listeners to click targets added since the last scan.
    pub fn rescan(&self) -> usize {
        if !self.installed.get() {
            return 0;
        }
        self.extractor.attach_listeners(&mut self.page.borrow_mut())
    }

    /// Handle one physical click on `target`.
    pub async fn click(&self, target: NodeId) -> ClickOutcome {
        if !self.installed.get() {
            return ClickOutcome::Ignored;
        }

        let routed = {
            let page = self.page.borrow();
            self.extractor.route_click(&page, target)
        };
        let Some(routed) = routed else {
            return ClickOutcome::Ignored;
        };

        if self.session.borrow().before_click() == ClickAction::ForceReload {
            self.page.borrow_mut().request_reload();
            return ClickOutcome::Reloaded;
        }

        debug!("Extracted comment text: {}", routed.text);
        match self.request(ExtensionMessage::comment_clicked(routed.text)).await {
            Ok(reply) => {
                self.page.borrow_mut().dismiss_banner(BannerKind::Retry);
                trace!("Response from background: {:?}", reply);
                ClickOutcome::Sent {
                    path: routed.path,
                    reply,
                }
            }
            Err(error) => {
                let action = self.on_channel_failure(&error);
                ClickOutcome::Failed { error, action }
            }
        }
    }

    /// Ping the coordinator. Success restores a not-ready session; failure
    /// only leaves the check scheduled.
    pub async fn ready_check(&self) -> bool {
        match self.request(ExtensionMessage::Ping).await {
            Ok(_) => {
                let mut page = self.page.borrow_mut();
                page.dismiss_banner(BannerKind::Reload);
                page.dismiss_banner(BannerKind::Retry);
                true
            }
            Err(e) => {
                debug!("Ready check failed: {}", e);
                false
            }
        }
    }

    async fn request(&self, message: ExtensionMessage) -> Result<Reply, ChannelError> {
        let reply = self.port.send_message(message)?.recv().await?;
        self.session.borrow_mut().record_success();
        Ok(reply)
    }

    fn on_channel_failure(&self, error: &ChannelError) -> FailureAction {
        if error.is_permanent() {
            warn!("Extension context invalidated: {}", error);
        } else {
            warn!("Error sending message: {}", error);
        }

        let action = self.session.borrow_mut().record_failure();
        let mut page = self.page.borrow_mut();
        match action {
            FailureAction::ShowRetry => page.show_banner(BannerKind::Retry, RETRY_BANNER_TEXT),
            FailureAction::MarkNotReady => {
                page.dismiss_banner(BannerKind::Retry);
                page.show_banner(BannerKind::Reload, RELOAD_BANNER_TEXT);
            }
        }
        action
    }

    /// Answer a message delivered to this tab.
    pub fn handle_message(&self, envelope: Envelope) {
        match envelope.message {
            ExtensionMessage::FocusOnComment(ref focus) => {
                let success = self.focus_on_comment(&focus.comment_text);
                envelope.respond(Reply::focus(success));
            }
            ExtensionMessage::SettingsChanged(ref changed) => {
                self.page
                    .borrow_mut()
                    .show_banner(BannerKind::SettingsChanged, changed.message.clone());
                envelope.respond(Reply::status(SETTINGS_ACK_STATUS));
            }
            ref other => trace!("Content script ignoring {}", other.action()),
        }
    }

    /// Scroll to and highlight the comment whose text contains the leading
    /// characters of `comment_text`.
    pub fn focus_on_comment(&self, comment_text: &str) -> bool {
        let prefix: String = comment_text
            .chars()
            .take(self.config.focus_prefix_chars)
            .collect();

        let found = {
            let page = self.page.borrow();
            self.extractor.find_matching(&page, &prefix)
        };

        match found {
            Some(id) => {
                info!("Found matching comment, focusing on it");
                let mut page = self.page.borrow_mut();
                page.scroll_into_view(id);
                page.highlight(id, self.config.highlight_duration());
                true
            }
            None => {
                debug!("Could not find matching comment");
                false
            }
        }
    }

    /// Drive the script until the page goes away.
    ///
    /// After the initial delay listeners are installed and readiness is
    /// checked. From then on mutations trigger a debounced rescan, a slower
    /// interval rescans as a safety net, and the ready check repeats while
    /// the session needs it. Losing the extension side of the channel does
    /// not stop the script: clicks keep arriving and go through the retry
    /// policy.
    pub async fn run(self: Rc<Self>, mut inbox: Inbox, mut events: mpsc::UnboundedReceiver<PageEvent>) {
        let mutations = self.page.borrow().mutation_signal();

        sleep(self.config.initial_delay()).await;
        self.install();
        self.ready_check().await;

        let start = Instant::now();
        let mut rescan = interval_at(start + self.config.rescan_interval(), self.config.rescan_interval());
        let mut ready = interval_at(
            start + self.config.ready_check_interval(),
            self.config.ready_check_interval(),
        );
        let mut inbox_open = true;

        loop {
            tokio::select! {
                message = inbox.recv(), if inbox_open => match message {
                    Some(envelope) => self.handle_message(envelope),
                    None => {
                        debug!("Extension side of the channel closed");
                        inbox_open = false;
                    }
                },
                event = events.recv() => match event {
                    Some(PageEvent::Click(target)) => {
                        self.click(target).await;
                    }
                    None => break,
                },
                _ = mutations.notified() => {
                    sleep(self.config.mutation_debounce()).await;
                    self.rescan();
                }
                _ = rescan.tick() => {
                    self.rescan();
                }
                _ = ready.tick(), if self.session.borrow().needs_ready_check() => {
                    self.ready_check().await;
                }
            }
        }

        info!("Content script stopped");
    }
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
