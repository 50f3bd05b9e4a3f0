//! # ThreadLens Protocols
//!
//! Shared protocol definitions for the ThreadLens comment summarizer.
//! Contains the data model, the inter-context message contract and the
//! traits at every context boundary - no implementations.
//!
//! ## Core Traits
//!
//! - [`SummaryProvider`] - Turns a comment thread into a summary
//! - [`SettingsStore`] - Persistent key-value settings with change events
//! - [`RuntimeMessenger`] - Extension-wide message delivery
//! - [`TabMessenger`] - Delivery to content scripts running in host-page tabs

pub mod error;
pub mod message;
pub mod messaging;
pub mod provider;
pub mod settings;
pub mod types;

pub use error::{ChannelError, ErrorKind, ProviderError, SettingsError};
pub use message::{
    CommentClicked, ExtensionMessage, FocusOnComment, ProcessingComment, Reply, SettingsChanged,
    SummaryResultPayload,
};
pub use messaging::{Envelope, PendingReply, RuntimeMessenger, TabId, TabInfo, TabMessenger};
pub use provider::SummaryProvider;
pub use settings::{SettingsChange, SettingsMap, SettingsStore};
pub use types::*;
