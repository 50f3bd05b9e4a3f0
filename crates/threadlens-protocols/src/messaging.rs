//! Message delivery between contexts.
//!
//! Delivery is split in two steps: enqueueing is synchronous and reports
//! whether any receiver exists, while the reply is awaited separately through
//! [`PendingReply`]. Fire-and-forget senders simply drop the pending reply.

use futures::future::select_ok;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::ChannelError;
use crate::message::{ExtensionMessage, Reply};

/// Host-page tab identifier.
pub type TabId = u32;

/// A host-page tab known to the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
    #[serde(default)]
    pub active: bool,
}

/// A delivered message plus the channel to answer it on.
#[derive(Debug)]
pub struct Envelope {
    pub message: ExtensionMessage,
    reply: oneshot::Sender<Reply>,
}

impl Envelope {
    pub fn new(message: ExtensionMessage) -> (Self, oneshot::Receiver<Reply>) {
        let (reply, rx) = oneshot::channel();
        (Self { message, reply }, rx)
    }

    /// Answer the sender. A sender that stopped listening is not an error.
    pub fn respond(self, reply: Reply) {
        let _ = self.reply.send(reply);
    }

    /// Split into the message and its reply handle.
    pub fn into_parts(self) -> (ExtensionMessage, oneshot::Sender<Reply>) {
        (self.message, self.reply)
    }
}

/// Replies outstanding for one delivered message.
///
/// When several contexts received the message, the first reply wins.
#[derive(Debug)]
pub struct PendingReply {
    receivers: Vec<oneshot::Receiver<Reply>>,
}

impl PendingReply {
    pub fn new(receivers: Vec<oneshot::Receiver<Reply>>) -> Self {
        Self { receivers }
    }

    pub fn receivers(&self) -> usize {
        self.receivers.len()
    }

    /// Wait for the first reply from any receiver.
    pub async fn recv(self) -> Result<Reply, ChannelError> {
        if self.receivers.is_empty() {
            return Err(ChannelError::PortClosed);
        }
        select_ok(self.receivers)
            .await
            .map(|(reply, _rest)| reply)
            .map_err(|_| ChannelError::PortClosed)
    }
}

/// Extension-wide delivery, the equivalent of `runtime.sendMessage`.
///
/// The message reaches every extension context except the sender.
pub trait RuntimeMessenger: Send + Sync {
    fn send_message(&self, message: ExtensionMessage) -> Result<PendingReply, ChannelError>;
}

/// Delivery to content scripts in host-page tabs.
pub trait TabMessenger: Send + Sync {
    /// Tabs whose URL matches a match pattern such as `https://docs.google.com/document/*`.
    fn query_tabs(&self, pattern: &str) -> Vec<TabInfo>;

    /// The tab the user is currently looking at.
    fn active_tab(&self) -> Option<TabInfo>;

    fn send_to_tab(&self, tab: TabId, message: ExtensionMessage) -> Result<PendingReply, ChannelError>;
}
