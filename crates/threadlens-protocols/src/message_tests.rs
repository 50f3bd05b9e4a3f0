use super::*;
use serde_json::json;

#[test]
fn test_comment_clicked_wire_shape() {
    let msg = ExtensionMessage::comment_clicked("Ada: ship it");
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value, json!({"action": "commentClicked", "commentText": "Ada: ship it"}));
}

#[test]
fn test_ping_is_bare_action() {
    let value = serde_json::to_value(ExtensionMessage::Ping).unwrap();
    assert_eq!(value, json!({"action": "ping"}));
    let parsed: ExtensionMessage = serde_json::from_value(json!({"action": "ping"})).unwrap();
    assert_eq!(parsed, ExtensionMessage::Ping);
}

#[test]
fn test_summary_result_success_shape() {
    let payload = SummaryResultPayload::new(
        SummarizationResult::success("Short."),
        "Ada: long text",
        Some(3),
    );
    let value = serde_json::to_value(ExtensionMessage::SummaryResult(payload)).unwrap();
    assert_eq!(value["action"], "summaryResult");
    assert_eq!(value["success"], true);
    assert_eq!(value["summary"], "Short.");
    assert_eq!(value["originalComment"], "Ada: long text");
    assert_eq!(value["requestId"], 3);
    assert!(value.get("error").is_none());
}

#[test]
fn test_summary_result_failure_shape() {
    let payload = SummaryResultPayload::new(
        SummarizationResult::failure("API Error: quota"),
        "text",
        None,
    );
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["error"], "API Error: quota");
    assert!(value.get("summary").is_none());
    assert!(value.get("requestId").is_none());
}

#[test]
fn test_summary_result_accepts_error_message_alias() {
    let parsed: ExtensionMessage = serde_json::from_value(json!({
        "action": "summaryResult",
        "success": false,
        "errorMessage": "boom"
    }))
    .unwrap();
    match parsed {
        ExtensionMessage::SummaryResult(payload) => {
            assert_eq!(payload.result(), SummarizationResult::failure("boom"));
            assert!(payload.original_comment.is_none());
        }
        other => panic!("unexpected message: {:?}", other),
    }
}

#[test]
fn test_payload_result_defaults_error_text() {
    let payload = SummaryResultPayload {
        success: false,
        summary: None,
        error: None,
        original_comment: None,
        request_id: None,
    };
    assert_eq!(payload.result(), SummarizationResult::failure("Unknown error occurred"));
}

#[test]
fn test_focus_message_round_trip() {
    let msg = ExtensionMessage::focus_on_comment("Ada: hi");
    let json = serde_json::to_string(&msg).unwrap();
    let parsed: ExtensionMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, msg);
    assert_eq!(parsed.action(), "focusOnComment");
}

#[test]
fn test_reply_untagged_shapes() {
    assert_eq!(
        serde_json::to_value(Reply::status("received and processing")).unwrap(),
        json!({"status": "received and processing"})
    );
    assert_eq!(serde_json::to_value(Reply::focus(true)).unwrap(), json!({"success": true}));

    let parsed: Reply = serde_json::from_value(json!({"success": false, "error": "x"})).unwrap();
    assert_eq!(
        parsed,
        Reply::Focus {
            success: false,
            error: Some("x".to_string())
        }
    );
}

#[test]
fn test_unknown_action_rejected() {
    let parsed = serde_json::from_value::<ExtensionMessage>(json!({"action": "explode"}));
    assert!(parsed.is_err());
}
