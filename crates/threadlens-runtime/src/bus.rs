//! Extension message bus.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use threadlens_protocols::error::ChannelError;
use threadlens_protocols::message::ExtensionMessage;
use threadlens_protocols::messaging::{
    Envelope, PendingReply, RuntimeMessenger, TabId, TabInfo, TabMessenger,
};

use crate::pattern::url_matches;

/// Receiving side of a context's mailbox.
pub type Inbox = mpsc::UnboundedReceiver<Envelope>;

type Outbox = mpsc::UnboundedSender<Envelope>;

/// Kind of extension context registered on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Background,
    Panel,
}

struct ExtensionContext {
    id: u64,
    kind: ContextKind,
    outbox: Outbox,
}

struct TabPort {
    generation: u64,
    outbox: Outbox,
}

struct TabEntry {
    url: String,
    active: bool,
    port: Option<TabPort>,
}

#[derive(Default)]
struct BusState {
    generation: u64,
    contexts: Vec<ExtensionContext>,
    tabs: BTreeMap<TabId, TabEntry>,
}

/// In-process equivalent of the browser extension runtime.
pub struct ExtensionBus {
    state: RwLock<BusState>,
    next_id: AtomicU64,
}

impl ExtensionBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(BusState::default()),
            next_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Register an extension context (background or panel).
    pub fn register_context(self: &Arc<Self>, kind: ContextKind) -> (ContextHandle, Inbox) {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let id = self.next_id();
        self.state
            .write()
            .contexts
            .push(ExtensionContext { id, kind, outbox });
        debug!("Registered {:?} context {}", kind, id);

        (
            ContextHandle {
                bus: Arc::clone(self),
                id,
                kind,
            },
            inbox,
        )
    }

    /// Remove an extension context, e.g. when the background worker is torn down.
    pub fn unregister_context(&self, id: u64) {
        self.state.write().contexts.retain(|c| c.id != id);
        debug!("Unregistered context {}", id);
    }

    /// Open a host-page tab. The first tab opened becomes active.
    pub fn open_tab(&self, url: impl Into<String>) -> TabId {
        let id = self.next_id() as TabId;
        let mut state = self.state.write();
        let active = state.tabs.is_empty();
        state.tabs.insert(
            id,
            TabEntry {
                url: url.into(),
                active,
                port: None,
            },
        );
        id
    }

    pub fn close_tab(&self, tab: TabId) {
        self.state.write().tabs.remove(&tab);
    }

    pub fn activate_tab(&self, tab: TabId) {
        let mut state = self.state.write();
        for (id, entry) in state.tabs.iter_mut() {
            entry.active = *id == tab;
        }
    }

    /// Inject a content script into `tab`, replacing any previous one.
    pub fn attach_content_script(
        self: &Arc<Self>,
        tab: TabId,
    ) -> Result<(ContentPort, Inbox), ChannelError> {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let mut state = self.state.write();
        let generation = state.generation;
        let entry = state
            .tabs
            .get_mut(&tab)
            .ok_or(ChannelError::TabNotFound(tab))?;
        entry.port = Some(TabPort { generation, outbox });
        debug!("Attached content script to tab {} (generation {})", tab, generation);

        Ok((
            ContentPort {
                bus: Arc::clone(self),
                tab,
                generation,
            },
            inbox,
        ))
    }

    /// Reload the extension while leaving host pages alone.
    ///
    /// Every registered context is dropped and every attached content script
    /// is orphaned: its port now fails with [`ChannelError::ContextInvalidated`]
    /// until the page is reloaded and a fresh script attached.
    pub fn reload_extension(&self) -> u64 {
        let mut state = self.state.write();
        state.generation += 1;
        state.contexts.clear();
        for entry in state.tabs.values_mut() {
            entry.port = None;
        }
        info!("Extension reloaded (generation {})", state.generation);
        state.generation
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Deliver to every extension context except `exclude`.
    fn deliver_to_contexts(
        &self,
        exclude: Option<u64>,
        message: ExtensionMessage,
    ) -> Result<PendingReply, ChannelError> {
        let mut state = self.state.write();
        state.contexts.retain(|c| !c.outbox.is_closed());

        let mut receivers = Vec::new();
        for context in state.contexts.iter().filter(|c| Some(c.id) != exclude) {
            let (envelope, rx) = Envelope::new(message.clone());
            if context.outbox.send(envelope).is_ok() {
                trace!("Delivered {} to {:?} {}", message.action(), context.kind, context.id);
                receivers.push(rx);
            }
        }

        if receivers.is_empty() {
            return Err(ChannelError::NoReceiver);
        }
        Ok(PendingReply::new(receivers))
    }

    fn deliver_to_tab(
        &self,
        tab: TabId,
        message: ExtensionMessage,
    ) -> Result<PendingReply, ChannelError> {
        let state = self.state.read();
        let entry = state.tabs.get(&tab).ok_or(ChannelError::TabNotFound(tab))?;
        let port = entry.port.as_ref().ok_or(ChannelError::NoReceiver)?;

        let (envelope, rx) = Envelope::new(message);
        port.outbox
            .send(envelope)
            .map_err(|_| ChannelError::NoReceiver)?;
        Ok(PendingReply::new(vec![rx]))
    }

    fn tabs_matching(&self, pattern: &str) -> Vec<TabInfo> {
        self.state
            .read()
            .tabs
            .iter()
            .filter(|(_, entry)| url_matches(pattern, &entry.url))
            .map(|(id, entry)| TabInfo {
                id: *id,
                url: entry.url.clone(),
                active: entry.active,
            })
            .collect()
    }

    fn active_tab_info(&self) -> Option<TabInfo> {
        self.state
            .read()
            .tabs
            .iter()
            .find(|(_, entry)| entry.active)
            .map(|(id, entry)| TabInfo {
                id: *id,
                url: entry.url.clone(),
                active: true,
            })
    }
}

/// Messaging handle of an extension context.
#[derive(Clone)]
pub struct ContextHandle {
    bus: Arc<ExtensionBus>,
    id: u64,
    kind: ContextKind,
}

impl ContextHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }
}

impl RuntimeMessenger for ContextHandle {
    fn send_message(&self, message: ExtensionMessage) -> Result<PendingReply, ChannelError> {
        self.bus.deliver_to_contexts(Some(self.id), message)
    }
}

impl TabMessenger for ContextHandle {
    fn query_tabs(&self, pattern: &str) -> Vec<TabInfo> {
        self.bus.tabs_matching(pattern)
    }

    fn active_tab(&self) -> Option<TabInfo> {
        self.bus.active_tab_info()
    }

    fn send_to_tab(&self, tab: TabId, message: ExtensionMessage) -> Result<PendingReply, ChannelError> {
        self.bus.deliver_to_tab(tab, message)
    }
}

/// Messaging handle of a content script, bound to the extension generation
/// it was injected under.
#[derive(Clone)]
pub struct ContentPort {
    bus: Arc<ExtensionBus>,
    tab: TabId,
    generation: u64,
}

impl ContentPort {
    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Whether the extension was reloaded since this script was injected.
    pub fn is_invalidated(&self) -> bool {
        self.bus.generation() != self.generation
    }
}

impl RuntimeMessenger for ContentPort {
    fn send_message(&self, message: ExtensionMessage) -> Result<PendingReply, ChannelError> {
        if self.is_invalidated() {
            return Err(ChannelError::ContextInvalidated);
        }
        self.bus.deliver_to_contexts(None, message)
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
