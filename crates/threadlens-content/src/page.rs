//! The host page as seen by the content script.

use std::collections::HashSet;
use std::sync::Arc;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use tokio::sync::Notify;
use tokio::time::{Duration, Instant};
use tracing::{debug, info};

/// How long a transient banner stays up.
const TRANSIENT_BANNER_TTL: Duration = Duration::from_secs(5);

/// Events the host page delivers to the content script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// A physical click whose innermost target is the given element.
    Click(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Asks the user to click again; hides itself.
    Retry,
    /// The page must reload before the extension works again.
    Reload,
    /// Provider settings changed in the extension.
    SettingsChanged,
}

/// An on-page notice injected by the content script.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Banner {
    fn is_visible_at(&self, now: Instant) -> bool {
        match self.kind {
            BannerKind::Retry => now.duration_since(self.shown_at) < TRANSIENT_BANNER_TTL,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Highlight {
    node: NodeId,
    until: Instant,
}

/// A parsed host document plus everything the content script has done to it.
pub struct HostPage {
    url: String,
    document: Html,
    listeners: HashSet<NodeId>,
    banners: Vec<Banner>,
    highlights: Vec<Highlight>,
    scrolled_to: Option<NodeId>,
    reload_requests: u32,
    mutations: Arc<Notify>,
}

impl HostPage {
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
            listeners: HashSet::new(),
            banners: Vec::new(),
            highlights: Vec::new(),
            scrolled_to: None,
            reload_requests: 0,
            mutations: Arc::new(Notify::new()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// The host rewrote its comment markup.
    ///
    /// Every element is new, so listener markers and highlights on the old
    /// elements are gone with them.
    pub fn replace_document(&mut self, html: &str) {
        self.document = Html::parse_document(html);
        self.listeners.clear();
        self.highlights.clear();
        self.scrolled_to = None;
        debug!("Host document replaced");
        self.mutations.notify_one();
    }

    /// Signal fired on every document mutation.
    pub fn mutation_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.mutations)
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.document.tree.get(id).and_then(ElementRef::wrap)
    }

    /// First element matching `css`, if the selector is valid and matches.
    pub fn find(&self, css: &str) -> Option<NodeId> {
        let selector = Selector::parse(css).ok()?;
        self.document.select(&selector).next().map(|e| e.id())
    }

    pub fn has_listener(&self, id: NodeId) -> bool {
        self.listeners.contains(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Set the attachment marker; false when it was already set.
    pub(crate) fn mark_listener(&mut self, id: NodeId) -> bool {
        self.listeners.insert(id)
    }

    pub fn show_banner(&mut self, kind: BannerKind, text: impl Into<String>) {
        let text = text.into();
        info!("Showing {:?} banner: {}", kind, text);
        self.banners.retain(|b| b.kind != kind);
        self.banners.push(Banner {
            kind,
            text,
            shown_at: Instant::now(),
        });
    }

    pub fn dismiss_banner(&mut self, kind: BannerKind) {
        self.banners.retain(|b| b.kind != kind);
    }

    /// Banners currently on screen.
    pub fn visible_banners(&self) -> Vec<&Banner> {
        let now = Instant::now();
        self.banners.iter().filter(|b| b.is_visible_at(now)).collect()
    }

    pub fn has_banner(&self, kind: BannerKind) -> bool {
        self.visible_banners().iter().any(|b| b.kind == kind)
    }

    pub fn scroll_into_view(&mut self, id: NodeId) {
        self.scrolled_to = Some(id);
    }

    pub fn scrolled_to(&self) -> Option<NodeId> {
        self.scrolled_to
    }

    pub fn highlight(&mut self, id: NodeId, duration: Duration) {
        let until = Instant::now() + duration;
        self.highlights.retain(|h| h.node != id);
        self.highlights.push(Highlight { node: id, until });
    }

    /// Elements whose highlight has not yet faded.
    pub fn highlighted(&self) -> Vec<NodeId> {
        let now = Instant::now();
        self.highlights
            .iter()
            .filter(|h| h.until > now)
            .map(|h| h.node)
            .collect()
    }

    pub fn request_reload(&mut self) {
        self.reload_requests += 1;
        info!("Reloading page {}", self.url);
    }

    pub fn reload_requests(&self) -> u32 {
        self.reload_requests
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
