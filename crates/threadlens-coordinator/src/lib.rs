//! # ThreadLens Coordinator
//!
//! The background context. It receives `commentClicked` events from content
//! scripts, gates on the stored configuration, dispatches to the matching
//! summary provider and broadcasts the outcome to the panel. It also fans
//! provider-relevant settings changes out to every host-page tab.

mod coordinator;
mod error;
mod registry;

pub use coordinator::{Coordinator, ACK_STATUS, READY_STATUS, SETTINGS_CHANGED_MESSAGE};
pub use error::CoordinatorError;
pub use registry::ProviderRegistry;
