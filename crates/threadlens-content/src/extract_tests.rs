use super::*;

const THREAD: &str = r#"<html><body>
<div class="docos-docoview" id="thread">
  <div class="docos-replyview" id="c1">
    <div class="docos-replyview-author">Ada</div>
    <div class="docos-replyview-body">Should we cut section 2?</div>
  </div>
  <div class="docos-replyview" id="c2">
    <div class="docos-author">Grace</div>
    <div class="docos-replyview-body">Yes, it repeats the intro.</div>
  </div>
  <div class="docos-replyview" id="c3">
    <span data-author="true">Linus</span>
    <span class="docos-text">Agreed.</span>
  </div>
</div>
<div class="comment-bubble" id="lonely">
  <span class="docos-content">  Typo in heading  </span>
</div>
<div class="docos-anchoreddocoview" id="bare">Just some   text</div>
<div class="comment-bubble" id="empty"></div>
</body></html>"#;

fn page() -> HostPage {
    HostPage::parse("https://docs.google.com/document/d/1/edit", THREAD)
}

fn element<'a>(page: &'a HostPage, css: &str) -> ElementRef<'a> {
    page.element(page.find(css).unwrap()).unwrap()
}

#[test]
fn test_thread_extraction_in_document_order() {
    let page = page();
    let extractor = Extractor::new();
    let text = extractor.extract_comment_text(element(&page, "#c2"));
    assert_eq!(
        text,
        "Ada: Should we cut section 2?\n\nGrace: Yes, it repeats the intro.\n\nLinus: Agreed."
    );
}

#[test]
fn test_container_itself_is_single_comment_path() {
    let page = page();
    let extractor = Extractor::new();
    let thread = element(&page, "#thread");
    assert_eq!(
        extractor.find_thread_container(thread).unwrap().id(),
        thread.id()
    );
    // No distinct container: the first text selector with any match
    // inside the element wins, whichever comment it belongs to.
    assert_eq!(extractor.extract_comment_text(thread), "Agreed.");
}

#[test]
fn test_thread_without_items_falls_back_to_text() {
    let html = r#"<div class="docos-streamdocoview"><p id="inner">  Hello <b>there</b>  </p></div>"#;
    let page = HostPage::parse("u", html);
    let extractor = Extractor::new();
    let container = element(&page, ".docos-streamdocoview");
    assert_eq!(extractor.extract_thread(container), "Hello there");
    assert_eq!(
        extractor.extract_comment_text(element(&page, "#inner")),
        "Hello there"
    );
}

#[test]
fn test_empty_author_falls_through_to_next_selector() {
    let html = r#"<div class="docos-docoview">
        <div class="docos-replyview" id="a">
            <div class="docos-replyview-author"></div>
            <div class="docos-author">Grace</div>
            <div class="docos-replyview-body">Hi</div>
        </div>
    </div>"#;
    let page = HostPage::parse("u", html);
    let extractor = Extractor::new();
    assert_eq!(extractor.extract_comment_text(element(&page, "#a")), "Grace: Hi");
}

#[test]
fn test_default_author_label() {
    let html = r#"<div class="docos-docoview">
        <div class="comment-container" id="a"><span class="docos-text">First</span></div>
        <div class="comment-container"><span class="docos-text">Second</span></div>
    </div>"#;
    let page = HostPage::parse("u", html);
    let extractor = Extractor::new();
    assert_eq!(
        extractor.extract_comment_text(element(&page, "#a")),
        "Commenter 1: First\n\nCommenter 2: Second"
    );
}

#[test]
fn test_single_comment_text_selector() {
    let page = page();
    let extractor = Extractor::new();
    assert_eq!(
        extractor.extract_comment_text(element(&page, "#lonely")),
        "Typo in heading"
    );
    assert_eq!(
        extractor.extract_comment_text(element(&page, "#bare")),
        "Just some   text"
    );
}

#[test]
fn test_attach_scan_is_idempotent() {
    let mut page = page();
    let extractor = Extractor::new();

    let first = extractor.attach_listeners(&mut page);
    assert_eq!(first, 7);
    let marked = page.listener_count();

    assert_eq!(extractor.attach_listeners(&mut page), 0);
    assert_eq!(page.listener_count(), marked);
    assert!(page.has_listener(page.find("#thread").unwrap()));
}

#[test]
fn test_rescan_after_replacement_reattaches() {
    let mut page = page();
    let extractor = Extractor::new();
    extractor.attach_listeners(&mut page);

    page.replace_document(r#"<div class="comment-bubble">New</div>"#);
    assert_eq!(extractor.attach_listeners(&mut page), 1);
}

#[test]
fn test_click_routes_once_via_delegation() {
    let mut page = page();
    let extractor = Extractor::new();
    extractor.attach_listeners(&mut page);

    let inner = page.find("#c1 .docos-replyview-body").unwrap();
    let routed = extractor.route_click(&page, inner).unwrap();
    assert_eq!(routed.path, ClickPath::Delegated);
    assert_eq!(routed.element, page.find("#c1").unwrap());
    assert!(routed.text.starts_with("Ada: Should we cut section 2?"));
    assert!(routed.text.ends_with("Linus: Agreed."));
}

#[test]
fn test_click_outside_comments_is_ignored() {
    let html = r#"<body><p id="para">Body text</p><div class="comment-bubble">x</div></body>"#;
    let page = HostPage::parse("u", html);
    let extractor = Extractor::new();
    assert!(extractor.route_click(&page, page.find("#para").unwrap()).is_none());
}

#[test]
fn test_direct_listener_takes_unclaimed_click() {
    // The innermost click target is empty, so delegation claims nothing;
    // the listener on the enclosing element dispatches instead.
    let html = r#"<div class="docos-wackomsupport-commentview" id="outer">
        Outer comment
        <div class="comment-bubble" id="inner"></div>
    </div>"#;
    let mut page = HostPage::parse("u", html);
    let extractor = Extractor::new();
    extractor.attach_listeners(&mut page);

    let routed = extractor
        .route_click(&page, page.find("#inner").unwrap())
        .unwrap();
    assert_eq!(routed.path, ClickPath::Direct);
    assert_eq!(routed.element, page.find("#outer").unwrap());
    assert_eq!(routed.text, "Outer comment");
}

#[test]
fn test_empty_target_without_listeners_dispatches_nothing() {
    let page = page();
    let extractor = Extractor::new();
    assert!(extractor
        .route_click(&page, page.find("#empty").unwrap())
        .is_none());
}

#[test]
fn test_find_matching_by_prefix() {
    let page = page();
    let extractor = Extractor::new();
    // The container itself extracts as a single comment, so the first
    // reply carrying the whole thread is the match.
    let found = extractor.find_matching(&page, "Ada: Should we cut").unwrap();
    assert_eq!(found, page.find("#c1").unwrap());
    assert!(extractor.find_matching(&page, "nothing like this").is_none());
}
