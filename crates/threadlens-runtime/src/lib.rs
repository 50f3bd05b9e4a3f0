//! # ThreadLens Runtime
//!
//! The message substrate between the background coordinator, the panel and
//! the content scripts running in host-page tabs.
//!
//! Each context owns an inbox of [`Envelope`](threadlens_protocols::Envelope)s
//! and sends through a handle bound to its own identity, so contexts share no
//! memory. The bus models the two lifecycle facts the content script has to
//! survive: the background context can be absent for a while, and an
//! extension reload orphans every content script that was attached before it.

mod bus;
mod pattern;

pub use bus::{ContentPort, ContextHandle, ContextKind, ExtensionBus, Inbox};
pub use pattern::url_matches;
