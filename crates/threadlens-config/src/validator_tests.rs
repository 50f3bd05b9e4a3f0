use super::*;

#[test]
fn test_validate_default_config() {
    let result = ConfigValidator::validate(&AppConfig::default());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_empty_match_pattern() {
    let mut config = AppConfig::default();
    config.site.match_pattern = " ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "site.match_pattern"));
}

#[test]
fn test_validate_zero_interval() {
    let mut config = AppConfig::default();
    config.content.rescan_interval_ms = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "content.rescan_interval_ms"));
}

#[test]
fn test_validate_zero_retry_budget_is_warning() {
    let mut config = AppConfig::default();
    config.content.retry_budget = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "content.retry_budget"));
}

#[test]
fn test_validate_invalid_base_url() {
    let mut config = AppConfig::default();
    config.providers.gemini.base_url = "generativelanguage.googleapis.com".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "providers.gemini.base_url"));
}

#[test]
fn test_validate_api_configuration_invariant() {
    let broken = ApiConfiguration::default().verified();
    let result = ConfigValidator::validate_api_configuration(&broken);
    assert!(!result.is_valid());
    assert_eq!(result.errors[0].path, "configVerified");

    let ok = ApiConfiguration::gemini("key", "gemini-1.5-flash").verified();
    assert!(ConfigValidator::validate_api_configuration(&ok).is_valid());
}

#[test]
fn test_validate_api_configuration_endpoint_scheme_warning() {
    let config = ApiConfiguration::ollama("localhost:11434", "");
    let result = ConfigValidator::validate_api_configuration(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "ollamaEndpoint"));
}
