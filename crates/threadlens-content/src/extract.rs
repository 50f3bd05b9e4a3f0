//! Thread discovery, text extraction and click routing.

use ego_tree::NodeId;
use scraper::{ElementRef, Selector};
use tracing::{debug, trace};

use threadlens_protocols::types::CommentThread;

use crate::page::HostPage;
use crate::selectors::{SelectorList, SelectorTable};

/// Which listener dispatched a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickPath {
    /// The document-level capturing handler.
    Delegated,
    /// A per-element handler attached by a scan.
    Direct,
}

/// A click resolved to a comment element and its extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedClick {
    pub path: ClickPath,
    pub element: NodeId,
    pub text: String,
}

/// Comment extraction over a host document.
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: SelectorTable,
}

fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Descendants of `element` (excluding itself) matching `selector`.
fn descendants<'a>(
    element: ElementRef<'a>,
    selector: &'a Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let root = element.id();
    element.select(selector).filter(move |e| e.id() != root)
}

/// `element` or its nearest ancestor matching `selector`.
fn closest<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    if selector.matches(&element) {
        return Some(element);
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| selector.matches(e))
}

fn first_descendant_text(element: ElementRef<'_>, list: &SelectorList) -> Option<String> {
    list.iter().find_map(|(source, selector)| {
        descendants(element, selector).next().map(|found| {
            trace!("Found comment text using selector: {}", source);
            text_content(found)
        })
    })
}

/// Like [`first_descendant_text`], but a match with no text falls through
/// to the next selector.
fn first_nonempty_descendant_text(element: ElementRef<'_>, list: &SelectorList) -> Option<String> {
    list.iter().find_map(|(source, selector)| {
        descendants(element, selector)
            .next()
            .map(text_content)
            .filter(|text| !text.is_empty())
            .inspect(|_| trace!("Found comment author using selector: {}", source))
    })
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            selectors: SelectorTable::new(),
        }
    }

    /// Resolve `element` to its thread container: a direct match against
    /// any thread selector wins over an ancestor match.
    pub fn find_thread_container<'a>(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        if self
            .selectors
            .threads
            .iter()
            .any(|(_, selector)| selector.matches(&element))
        {
            return Some(element);
        }
        self.selectors
            .threads
            .iter()
            .find_map(|(_, selector)| closest(element, selector))
    }

    /// Text to summarize for a clicked comment element.
    ///
    /// A distinct enclosing thread container yields the whole conversation;
    /// otherwise the element is treated as a single comment.
    pub fn extract_comment_text(&self, element: ElementRef<'_>) -> String {
        if let Some(container) = self.find_thread_container(element) {
            if container.id() != element.id() {
                debug!("Found a thread container, extracting all comments");
                return self.extract_thread(container);
            }
        }

        first_descendant_text(element, &self.selectors.texts).unwrap_or_else(|| {
            trace!("Using element text content as fallback");
            text_content(element)
        })
    }

    /// Every comment of a thread container as `author: body` paragraphs,
    /// or the container's own text when no comment item is recognised.
    pub fn extract_thread(&self, container: ElementRef<'_>) -> String {
        let items = self.selectors.items.iter().find_map(|(source, selector)| {
            let found: Vec<_> = descendants(container, selector).collect();
            if found.is_empty() {
                None
            } else {
                debug!("Found {} comments using selector: {}", found.len(), source);
                Some(found)
            }
        });

        let Some(items) = items else {
            return text_content(container);
        };

        let mut thread = CommentThread::default();
        for (index, item) in items.into_iter().enumerate() {
            let author = first_nonempty_descendant_text(item, &self.selectors.authors)
                .unwrap_or_else(|| format!("Commenter {}", index + 1));
            let body = first_descendant_text(item, &self.selectors.texts)
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| text_content(item));
            thread.push(author, body);
        }
        thread.to_text()
    }

    /// Every element carrying a click target selector, in selector order.
    pub fn click_targets<'a>(&'a self, page: &'a HostPage) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.selectors
            .click_targets
            .iter()
            .flat_map(move |(_, selector)| page.document().select(selector))
    }

    /// Attach a listener to every click target not yet marked.
    ///
    /// Returns the number of newly attached listeners; a second scan over
    /// an unchanged document attaches none.
    pub fn attach_listeners(&self, page: &mut HostPage) -> usize {
        let targets: Vec<NodeId> = self.click_targets(page).map(|e| e.id()).collect();
        let attached = targets
            .into_iter()
            .filter(|id| page.mark_listener(*id))
            .count();
        if attached > 0 {
            debug!("Attached {} comment listener(s)", attached);
        }
        attached
    }

    /// Route one physical click.
    ///
    /// The capturing document handler runs first: it resolves the target to
    /// its innermost click-target element and claims the click when that
    /// element yields text. The per-element handlers along the bubble path
    /// only run for a click nobody claimed yet. At most one dispatch per
    /// click.
    ///
    /// Delegation picks the innermost click-target ancestor, not the first
    /// selector in priority order with any ancestor match, so a reply nested
    /// in a thread view resolves to the nearest comment element.
    pub fn route_click(&self, page: &HostPage, target: NodeId) -> Option<RoutedClick> {
        let target = page.element(target)?;
        let bubble_path = || std::iter::once(target).chain(target.ancestors().filter_map(ElementRef::wrap));

        let delegated = bubble_path().find_map(|e| {
            self.selectors
                .click_targets
                .iter()
                .find(|(_, selector)| selector.matches(&e))
                .map(|(source, _)| (e, source))
        });
        if let Some((container, source)) = delegated {
            debug!("Comment clicked via delegation: {}", source);
            let text = self.extract_comment_text(container);
            if !text.is_empty() {
                return Some(RoutedClick {
                    path: ClickPath::Delegated,
                    element: container.id(),
                    text,
                });
            }
        }

        bubble_path()
            .filter(|e| page.has_listener(e.id()))
            .find_map(|e| {
                let text = self.extract_comment_text(e);
                (!text.is_empty()).then(|| {
                    debug!("Comment clicked through direct listener");
                    RoutedClick {
                        path: ClickPath::Direct,
                        element: e.id(),
                        text,
                    }
                })
            })
    }

    /// The first click target whose extracted text contains `prefix`.
    pub fn find_matching(&self, page: &HostPage, prefix: &str) -> Option<NodeId> {
        self.click_targets(page)
            .find(|e| {
                let text = self.extract_comment_text(*e);
                !text.is_empty() && text.contains(prefix)
            })
            .map(|e| e.id())
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
