use super::*;

#[test]
fn test_provider_kind_round_trip_str() {
    assert_eq!("gemini".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
    assert_eq!("ollama".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
    assert!("claude".parse::<ProviderKind>().is_err());
    assert_eq!(ProviderKind::Ollama.to_string(), "ollama");
}

#[test]
fn test_provider_kind_serde_lowercase() {
    let json = serde_json::to_value(ProviderKind::Gemini).unwrap();
    assert_eq!(json, "gemini");
    let kind: ProviderKind = serde_json::from_value(serde_json::json!("ollama")).unwrap();
    assert_eq!(kind, ProviderKind::Ollama);
}

#[test]
fn test_default_provider_is_gemini() {
    assert_eq!(ProviderKind::default(), ProviderKind::Gemini);
}

#[test]
fn test_openai_suffix_detection() {
    assert!(is_openai_compatible("http://localhost:8080/v1"));
    assert!(!is_openai_compatible("http://localhost:11434"));
    assert!(!is_openai_compatible("http://localhost:8080/v1/"));
}

#[test]
fn test_missing_api_key() {
    let config = ApiConfiguration {
        provider: ProviderKind::Gemini,
        credential: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(config.missing_requirement(), Some(ProviderError::MissingApiKey));
}

#[test]
fn test_missing_endpoint() {
    let config = ApiConfiguration {
        provider: ProviderKind::Ollama,
        ..Default::default()
    };
    assert_eq!(config.missing_requirement(), Some(ProviderError::MissingEndpoint));
}

#[test]
fn test_complete_configs_have_no_missing_requirement() {
    assert!(ApiConfiguration::gemini("key", "gemini-1.5-flash")
        .missing_requirement()
        .is_none());
    assert!(ApiConfiguration::ollama("http://localhost:11434", "")
        .missing_requirement()
        .is_none());
}

#[test]
fn test_verified_invariant() {
    assert!(ApiConfiguration::default().satisfies_verified_invariant());
    assert!(!ApiConfiguration::default().verified().satisfies_verified_invariant());
    assert!(ApiConfiguration::gemini("key", "m").verified().satisfies_verified_invariant());
    assert!(ApiConfiguration::ollama("http://h:11434", "")
        .verified()
        .satisfies_verified_invariant());
    assert!(!ApiConfiguration::ollama("http://h:8080/v1", "")
        .verified()
        .satisfies_verified_invariant());
    assert!(ApiConfiguration::ollama("http://h:8080/v1", "llama3")
        .verified()
        .satisfies_verified_invariant());
}
