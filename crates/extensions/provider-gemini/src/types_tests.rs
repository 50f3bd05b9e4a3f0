use super::*;
use serde_json::json;

#[test]
fn test_request_serialization() {
    let request = GenerateContentRequest::single_turn(
        "Summarize: \"hi\"",
        GenerationConfig {
            temperature: 0.2,
            max_output_tokens: 100,
        },
    );
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["contents"][0]["parts"][0]["text"], "Summarize: \"hi\"");
    assert_eq!(value["generationConfig"]["maxOutputTokens"], 100);
    assert!(value["generationConfig"]["temperature"].as_f64().unwrap() > 0.19);
    assert!(value["contents"][0].get("role").is_none());
}

#[test]
fn test_first_text_present() {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {"parts": [{"text": "  A short summary. "}], "role": "model"},
            "finishReason": "STOP"
        }]
    }))
    .unwrap();
    assert_eq!(response.first_text(), Some("  A short summary. "));
}

#[test]
fn test_first_text_missing_shapes() {
    for body in [
        json!({}),
        json!({"candidates": []}),
        json!({"candidates": [{}]}),
        json!({"candidates": [{"content": {}}]}),
        json!({"candidates": [{"content": {"parts": []}}]}),
        json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
    ] {
        let response: GenerateContentResponse = serde_json::from_value(body.clone()).unwrap();
        assert!(response.first_text().is_none(), "{body}");
    }
}

#[test]
fn test_error_message() {
    let error: GeminiError = serde_json::from_value(json!({
        "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
    }))
    .unwrap();
    assert_eq!(error.message(), Some("API key not valid."));

    let empty: GeminiError = serde_json::from_value(json!({})).unwrap();
    assert!(empty.message().is_none());
}

#[test]
fn test_gemini_model_names() {
    let list: ModelList = serde_json::from_value(json!({
        "models": [
            {"name": "models/gemini-1.5-flash", "displayName": "Gemini 1.5 Flash"},
            {"name": "models/embedding-001"},
            {"name": "models/gemini-1.5-pro"}
        ]
    }))
    .unwrap();
    assert_eq!(
        list.gemini_model_names(),
        vec!["gemini-1.5-flash".to_string(), "gemini-1.5-pro".to_string()]
    );
}
