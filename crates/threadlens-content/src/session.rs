//! Per-tab channel session state.
//!
//! The content script and the coordinator have independent lifecycles: the
//! extension can be reloaded while the page stays open, orphaning this
//! script. The session tells a transient hiccup apart from a detached
//! script that needs a page reload.

use tracing::{info, warn};

/// What to do after a failed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Ask the user to click again; do not reload.
    ShowRetry,
    /// The retry budget is spent; the page must reload.
    MarkNotReady,
}

/// What to do with the next click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Send,
    ForceReload,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    retry_budget: u32,
    consecutive_failures: u32,
    ready: bool,
    confirmed: bool,
}

impl SessionState {
    pub fn new(retry_budget: u32) -> Self {
        Self {
            retry_budget,
            consecutive_failures: 0,
            ready: true,
            confirmed: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Whether the periodic ready check should ping: until the first
    /// success, and again after any failure.
    pub fn needs_ready_check(&self) -> bool {
        !self.confirmed || !self.ready || self.consecutive_failures > 0
    }

    pub fn before_click(&self) -> ClickAction {
        if self.ready {
            ClickAction::Send
        } else {
            ClickAction::ForceReload
        }
    }

    pub fn record_failure(&mut self) -> FailureAction {
        self.consecutive_failures += 1;
        self.confirmed = false;
        if self.consecutive_failures > self.retry_budget {
            if self.ready {
                warn!(
                    "Channel failed {} times in a row; page reload required",
                    self.consecutive_failures
                );
            }
            self.ready = false;
            FailureAction::MarkNotReady
        } else {
            FailureAction::ShowRetry
        }
    }

    pub fn record_success(&mut self) {
        if !self.ready || self.consecutive_failures > 0 {
            info!("Channel to extension restored");
        }
        self.consecutive_failures = 0;
        self.ready = true;
        self.confirmed = true;
    }
}
