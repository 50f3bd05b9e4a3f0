//! # ThreadLens Panel
//!
//! The side panel. It edits the provider configuration, tests credentials
//! directly against the provider, renders the summary broadcast by the
//! coordinator and can ask the active tab to bring the summarized thread
//! back into view.

mod controller;
mod error;
mod render;
mod state;

pub use controller::{
    PanelController, PROCESSING_ACK_STATUS, STALE_RESULT_STATUS, SUMMARY_ACK_STATUS,
};
pub use error::PanelError;
pub use render::{escape_html, unescape_html, SummaryContent, ERROR_HINT, LOADING_TEXT};
pub use state::{FormState, PanelView, StatusKind, StatusMessage, StatusSlot};
