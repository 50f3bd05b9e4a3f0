use super::*;
use threadlens_protocols::message::Reply;

const DOCS_PATTERN: &str = "https://docs.google.com/document/*";

#[tokio::test]
async fn test_runtime_message_skips_sender() {
    let bus = ExtensionBus::new();
    let (background, mut bg_inbox) = bus.register_context(ContextKind::Background);
    let (_panel, mut panel_inbox) = bus.register_context(ContextKind::Panel);

    let pending = background
        .send_message(ExtensionMessage::comment_clicked("hi"))
        .unwrap();
    assert_eq!(pending.receivers(), 1);

    let envelope = panel_inbox.recv().await.unwrap();
    assert_eq!(envelope.message.action(), "commentClicked");
    assert!(bg_inbox.try_recv().is_err());
}

#[tokio::test]
async fn test_send_without_receivers_fails() {
    let bus = ExtensionBus::new();
    let (background, _inbox) = bus.register_context(ContextKind::Background);

    let err = background.send_message(ExtensionMessage::Ping).unwrap_err();
    assert_eq!(err, ChannelError::NoReceiver);
}

#[tokio::test]
async fn test_dropped_inbox_is_pruned() {
    let bus = ExtensionBus::new();
    let (background, _bg_inbox) = bus.register_context(ContextKind::Background);
    let (_panel, panel_inbox) = bus.register_context(ContextKind::Panel);
    drop(panel_inbox);

    let err = background.send_message(ExtensionMessage::Ping).unwrap_err();
    assert_eq!(err, ChannelError::NoReceiver);
}

#[tokio::test]
async fn test_unregistered_background_stops_receiving() {
    let bus = ExtensionBus::new();
    let (background, _bg_inbox) = bus.register_context(ContextKind::Background);
    let (_panel, mut panel_inbox) = bus.register_context(ContextKind::Panel);
    let tab = bus.open_tab("https://docs.google.com/document/d/abc/edit");
    let (port, _content_inbox) = bus.attach_content_script(tab).unwrap();

    bus.unregister_context(background.id());

    let pending = port.send_message(ExtensionMessage::comment_clicked("hi")).unwrap();
    assert_eq!(pending.receivers(), 1);
    assert_eq!(panel_inbox.recv().await.unwrap().message.action(), "commentClicked");

    drop(panel_inbox);
    let err = port.send_message(ExtensionMessage::Ping).unwrap_err();
    assert_eq!(err, ChannelError::NoReceiver);
}

#[tokio::test]
async fn test_content_script_reply_round_trip() {
    let bus = ExtensionBus::new();
    let (_background, mut bg_inbox) = bus.register_context(ContextKind::Background);
    let tab = bus.open_tab("https://docs.google.com/document/d/abc/edit");
    let (port, _content_inbox) = bus.attach_content_script(tab).unwrap();

    let pending = port.send_message(ExtensionMessage::Ping).unwrap();
    let envelope = bg_inbox.recv().await.unwrap();
    envelope.respond(Reply::status("ready"));

    assert_eq!(pending.recv().await.unwrap(), Reply::status("ready"));
}

#[tokio::test]
async fn test_reload_invalidates_content_port() {
    let bus = ExtensionBus::new();
    let (_background, _bg_inbox) = bus.register_context(ContextKind::Background);
    let tab = bus.open_tab("https://docs.google.com/document/d/abc/edit");
    let (port, _content_inbox) = bus.attach_content_script(tab).unwrap();
    assert!(!port.is_invalidated());

    bus.reload_extension();
    let (_background, _bg_inbox) = bus.register_context(ContextKind::Background);

    assert!(port.is_invalidated());
    assert_eq!(
        port.send_message(ExtensionMessage::Ping).unwrap_err(),
        ChannelError::ContextInvalidated
    );

    let (fresh, _inbox) = bus.attach_content_script(tab).unwrap();
    assert!(fresh.send_message(ExtensionMessage::Ping).is_ok());
}

#[tokio::test]
async fn test_query_tabs_by_pattern() {
    let bus = ExtensionBus::new();
    let (background, _inbox) = bus.register_context(ContextKind::Background);
    let doc = bus.open_tab("https://docs.google.com/document/d/abc/edit");
    bus.open_tab("https://example.com/");

    let tabs = background.query_tabs(DOCS_PATTERN);
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].id, doc);
    assert!(tabs[0].active);
}

#[tokio::test]
async fn test_send_to_tab_errors() {
    let bus = ExtensionBus::new();
    let (background, _inbox) = bus.register_context(ContextKind::Background);
    let tab = bus.open_tab("https://docs.google.com/document/d/abc/edit");

    assert_eq!(
        background
            .send_to_tab(tab, ExtensionMessage::settings_changed("x"))
            .unwrap_err(),
        ChannelError::NoReceiver
    );
    assert_eq!(
        background
            .send_to_tab(999, ExtensionMessage::settings_changed("x"))
            .unwrap_err(),
        ChannelError::TabNotFound(999)
    );
}

#[tokio::test]
async fn test_active_tab_follows_activation() {
    let bus = ExtensionBus::new();
    let (panel, _inbox) = bus.register_context(ContextKind::Panel);
    assert!(panel.active_tab().is_none());

    let first = bus.open_tab("https://docs.google.com/document/d/1/edit");
    let second = bus.open_tab("https://docs.google.com/document/d/2/edit");
    assert_eq!(panel.active_tab().unwrap().id, first);

    bus.activate_tab(second);
    assert_eq!(panel.active_tab().unwrap().id, second);

    bus.close_tab(second);
    assert!(panel.active_tab().is_none());
}

#[tokio::test]
async fn test_attach_to_unknown_tab() {
    let bus = ExtensionBus::new();
    assert!(matches!(
        bus.attach_content_script(42),
        Err(ChannelError::TabNotFound(42))
    ));
}
