use super::*;

const HTML: &str = r#"<html><body>
<div class="docos-docoview" id="t1"><span class="docos-text">Hello</span></div>
</body></html>"#;

#[test]
fn test_find_and_element() {
    let page = HostPage::parse("https://docs.google.com/document/d/1/edit", HTML);
    let id = page.find("#t1").unwrap();
    let element = page.element(id).unwrap();
    assert_eq!(element.value().attr("class"), Some("docos-docoview"));
    assert!(page.find("#missing").is_none());
    assert!(page.find("[[invalid").is_none());
}

#[test]
fn test_replace_document_clears_markers() {
    let mut page = HostPage::parse("u", HTML);
    let id = page.find("#t1").unwrap();
    assert!(page.mark_listener(id));
    assert!(!page.mark_listener(id));
    page.highlight(id, Duration::from_secs(2));

    page.replace_document(HTML);
    assert_eq!(page.listener_count(), 0);
    assert!(page.highlighted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_retry_banner_hides_itself() {
    let mut page = HostPage::parse("u", HTML);
    page.show_banner(BannerKind::Retry, "try again");
    page.show_banner(BannerKind::SettingsChanged, "settings");
    assert!(page.has_banner(BannerKind::Retry));

    tokio::time::advance(Duration::from_secs(6)).await;
    assert!(!page.has_banner(BannerKind::Retry));
    assert!(page.has_banner(BannerKind::SettingsChanged));
}

#[tokio::test(start_paused = true)]
async fn test_highlight_fades() {
    let mut page = HostPage::parse("u", HTML);
    let id = page.find("#t1").unwrap();
    page.highlight(id, Duration::from_secs(2));
    assert_eq!(page.highlighted(), vec![id]);

    tokio::time::advance(Duration::from_millis(2001)).await;
    assert!(page.highlighted().is_empty());
}

#[test]
fn test_banner_replaces_same_kind() {
    let mut page = HostPage::parse("u", HTML);
    page.show_banner(BannerKind::Reload, "one");
    page.show_banner(BannerKind::Reload, "two");
    let banners = page.visible_banners();
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0].text, "two");
}
