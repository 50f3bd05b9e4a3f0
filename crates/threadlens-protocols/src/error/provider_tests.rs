use super::*;

#[test]
fn test_configuration_messages() {
    assert_eq!(
        ProviderError::NotConfigured.to_string(),
        "API not configured. Please configure your API settings first."
    );
    assert!(ProviderError::MissingApiKey.to_string().contains("No Gemini API key found"));
    assert!(ProviderError::MissingEndpoint
        .to_string()
        .contains("Ollama configuration incomplete"));
}

#[test]
fn test_api_error_prefix() {
    let err = ProviderError::Api("API key not valid".to_string());
    assert_eq!(err.to_string(), "API Error: API key not valid");
}

#[test]
fn test_parse_error_is_distinct_from_http_error() {
    let parse = ProviderError::Parse("expected value at line 1 column 1".to_string());
    assert!(parse.to_string().starts_with("Failed to parse API response"));
    assert!(!parse.to_string().starts_with("API Error"));
}

#[test]
fn test_kind_classification() {
    assert_eq!(ProviderError::NotConfigured.kind(), ErrorKind::Configuration);
    assert_eq!(ProviderError::MissingApiKey.kind(), ErrorKind::Configuration);
    assert_eq!(ProviderError::MissingEndpoint.kind(), ErrorKind::Configuration);
    assert_eq!(ProviderError::Api("x".into()).kind(), ErrorKind::Transport);
    assert_eq!(ProviderError::EmptyResponse.kind(), ErrorKind::Transport);
    assert_eq!(ProviderError::Parse("x".into()).kind(), ErrorKind::Transport);
    assert_eq!(ProviderError::Network("x".into()).kind(), ErrorKind::Transport);
    assert_eq!(ProviderError::UnexpectedFormat.kind(), ErrorKind::Format);
}

#[test]
fn test_unexpected_format_message() {
    assert_eq!(
        ProviderError::UnexpectedFormat.to_string(),
        "Unexpected API response format"
    );
}
