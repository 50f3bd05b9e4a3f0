//! # ThreadLens Content
//!
//! The content script running inside a host document page. It finds
//! comment threads in markup it does not control, attaches click listeners
//! as the page mutates, sends the extracted thread to the coordinator and
//! recovers when the extension is reloaded underneath the page.
//!
//! The page document is not thread-safe, so everything here runs on a
//! single-threaded executor (`tokio::task::LocalSet`).

mod extract;
mod page;
mod script;
mod selectors;
mod session;

pub use extract::{ClickPath, Extractor, RoutedClick};
pub use page::{Banner, BannerKind, HostPage, PageEvent};
pub use script::{
    ClickOutcome, ContentScript, SETTINGS_ACK_STATUS, RELOAD_BANNER_TEXT, RETRY_BANNER_TEXT,
};
pub use selectors::{
    AUTHOR_SELECTORS, CLICK_TARGET_SELECTORS, COMMENT_ITEM_SELECTORS, TEXT_SELECTORS,
    THREAD_SELECTORS,
};
pub use session::{ClickAction, FailureAction, SessionState};

pub use ego_tree::NodeId;
