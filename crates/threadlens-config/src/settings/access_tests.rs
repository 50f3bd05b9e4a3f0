use super::*;
use crate::settings::{settings_map, MemorySettingsStore};
use serde_json::json;

#[tokio::test]
async fn test_empty_store_defaults_to_unverified_gemini() {
    let store = MemorySettingsStore::new();
    let config = load_api_configuration(&store, &ProvidersConfig::default())
        .await
        .unwrap();

    assert_eq!(config.provider, ProviderKind::Gemini);
    assert_eq!(config.model, "gemini-1.5-flash");
    assert!(config.credential.is_none());
    assert!(!config.verified);
}

#[tokio::test]
async fn test_ollama_uses_openai_model_or_default() {
    let store = MemorySettingsStore::with_values(settings_map([
        ("apiProvider", json!("ollama")),
        ("ollamaEndpoint", json!("http://localhost:8080/v1")),
        ("configVerified", json!(true)),
    ]));
    let config = load_api_configuration(&store, &ProvidersConfig::default())
        .await
        .unwrap();
    assert_eq!(config.provider, ProviderKind::Ollama);
    assert_eq!(config.model, "gpt-4");
    assert_eq!(config.endpoint(), Some("http://localhost:8080/v1"));
    assert!(config.verified);

    store
        .set(settings_map([("openaiModel", json!("llama3"))]))
        .await
        .unwrap();
    let config = load_api_configuration(&store, &ProvidersConfig::default())
        .await
        .unwrap();
    assert_eq!(config.model, "llama3");
}

#[tokio::test]
async fn test_unknown_provider_is_invalid_value() {
    let store = MemorySettingsStore::with_values(settings_map([("apiProvider", json!("claude"))]));
    let result = load_api_configuration(&store, &ProvidersConfig::default()).await;
    assert!(matches!(result, Err(SettingsError::InvalidValue { ref key, .. }) if key == "apiProvider"));
}

#[tokio::test]
async fn test_empty_strings_count_as_absent() {
    let store = MemorySettingsStore::with_values(settings_map([
        ("geminiApiKey", json!("")),
        ("geminiModel", json!("")),
    ]));
    let config = load_api_configuration(&store, &ProvidersConfig::default())
        .await
        .unwrap();
    assert!(config.credential.is_none());
    assert_eq!(config.model, "gemini-1.5-flash");
}

#[tokio::test]
async fn test_non_bool_verified_is_false() {
    let store = MemorySettingsStore::with_values(settings_map([("configVerified", json!("yes"))]));
    assert!(!is_config_verified(&store).await.unwrap());
}

#[tokio::test]
async fn test_seed_install_defaults_on_empty_store() {
    let store = MemorySettingsStore::new();
    let seeded = seed_install_defaults(&store).await.unwrap();
    assert_eq!(seeded, vec!["configVerified", "promptTemplate"]);

    assert_eq!(load_prompt_template(&store).await.unwrap(), DEFAULT_PROMPT_TEMPLATE);
    assert!(!is_config_verified(&store).await.unwrap());
}

#[tokio::test]
async fn test_seed_install_defaults_never_overwrites() {
    let store = MemorySettingsStore::with_values(settings_map([
        ("promptTemplate", json!("Custom:")),
        ("configVerified", json!(true)),
    ]));

    let seeded = seed_install_defaults(&store).await.unwrap();
    assert!(seeded.is_empty());
    assert_eq!(load_prompt_template(&store).await.unwrap(), "Custom:");
    assert!(is_config_verified(&store).await.unwrap());
}

#[tokio::test]
async fn test_seed_install_defaults_is_idempotent() {
    let store = MemorySettingsStore::new();
    seed_install_defaults(&store).await.unwrap();
    let second = seed_install_defaults(&store).await.unwrap();
    assert!(second.is_empty());
}
