//! Host-page selectors.
//!
//! The host markup is unversioned and these lists overlap, so order is
//! significant: the first structural match decides between the thread and
//! single-comment extraction paths.

use scraper::Selector;

/// Containers holding a whole conversation (root comment plus replies).
pub const THREAD_SELECTORS: &[&str] = &[
    ".docos-streamdocoview",
    ".docos-docoview-tesla-conflict",
    ".docos-anchoreddocoview",
    "[id^=\"docos-docoview-\"]",
    ".docos-docoview",
];

/// One comment inside a thread container.
pub const COMMENT_ITEM_SELECTORS: &[&str] = &[
    ".docos-replyview",
    ".docos-anchoredreplyview",
    ".docos-replyview-comment",
    ".comment-container",
];

/// Comment body text.
pub const TEXT_SELECTORS: &[&str] = &[
    ".docos-replyview-comment",
    ".docos-wackomsupport-commentcontent",
    ".docos-text",
    ".docos-replyview-body",
    "[data-comment-text=\"true\"]",
    ".docos-comment-text",
    ".docos-content",
];

/// Comment author label.
pub const AUTHOR_SELECTORS: &[&str] = &[
    ".docos-replyview-author",
    ".docos-author",
    "[data-author=\"true\"]",
];

/// Elements that receive click listeners; also the focus search order.
pub const CLICK_TARGET_SELECTORS: &[&str] = &[
    ".docos-streamdocoview",
    ".docos-docoview-tesla-conflict",
    ".docos-anchoreddocoview",
    "[id^=\"docos-docoview-\"]",
    ".docos-docoview",
    ".docos-wackomsupport-commentview",
    ".comment-container",
    ".comment-bubble",
    ".goog-inline-block.kix-commentflag",
    ".docos-anchoredreplyview",
    ".docos-replyview",
];

/// An ordered list of compiled selectors, keeping the source text for logs.
#[derive(Debug, Clone)]
pub(crate) struct SelectorList {
    entries: Vec<(&'static str, Selector)>,
}

impl SelectorList {
    fn compile(sources: &'static [&'static str]) -> Self {
        Self {
            entries: sources
                .iter()
                .map(|s| (*s, Selector::parse(s).expect("static comment selector")))
                .collect(),
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&'static str, &Selector)> {
        self.entries.iter().map(|(s, sel)| (*s, sel))
    }
}

/// Every selector list, compiled once per content script.
#[derive(Debug, Clone)]
pub(crate) struct SelectorTable {
    pub(crate) threads: SelectorList,
    pub(crate) items: SelectorList,
    pub(crate) texts: SelectorList,
    pub(crate) authors: SelectorList,
    pub(crate) click_targets: SelectorList,
}

impl SelectorTable {
    pub(crate) fn new() -> Self {
        Self {
            threads: SelectorList::compile(THREAD_SELECTORS),
            items: SelectorList::compile(COMMENT_ITEM_SELECTORS),
            texts: SelectorList::compile(TEXT_SELECTORS),
            authors: SelectorList::compile(AUTHOR_SELECTORS),
            click_targets: SelectorList::compile(CLICK_TARGET_SELECTORS),
        }
    }
}
