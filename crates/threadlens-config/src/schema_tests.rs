use super::*;

#[test]
fn test_default_site_pattern() {
    let config = AppConfig::default();
    assert_eq!(config.site.match_pattern, "https://docs.google.com/document/*");
}

#[test]
fn test_default_content_timings() {
    let content = ContentConfig::default();
    assert_eq!(content.initial_delay(), Duration::from_secs(2));
    assert_eq!(content.rescan_interval(), Duration::from_secs(5));
    assert_eq!(content.retry_budget, 2);
    assert_eq!(content.focus_prefix_chars, 50);
    assert_eq!(content.highlight_duration(), Duration::from_secs(2));
}

#[test]
fn test_default_provider_parameters() {
    let providers = ProvidersConfig::default();
    assert_eq!(providers.gemini.default_model, "gemini-1.5-flash");
    assert_eq!(providers.gemini.max_output_tokens, 100);
    assert!((providers.gemini.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(providers.ollama.default_openai_model, "gpt-4");
    assert_eq!(providers.ollama.max_tokens, 150);
    assert!((providers.ollama.temperature - 0.7).abs() < f32::EPSILON);
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config: AppConfig = toml::from_str(
        r#"
        [content]
        retry_budget = 4
        "#,
    )
    .unwrap();
    assert_eq!(config.content.retry_budget, 4);
    assert_eq!(config.content.rescan_interval_ms, 5000);
    assert_eq!(config.providers.gemini.default_model, "gemini-1.5-flash");
}

#[test]
fn test_settings_path_is_expanded() {
    let storage = StorageConfig::default();
    let path = storage.resolved_settings_path();
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with(".threadlens/settings.json"));
}
