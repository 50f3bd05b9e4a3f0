use super::*;

#[test]
fn test_registry_empty() {
    let registry = ProviderRegistry::default();
    assert!(registry.get(ProviderKind::Gemini).is_none());
    assert!(registry.get(ProviderKind::Ollama).is_none());
}

#[test]
fn test_from_config_registers_both() {
    let registry = ProviderRegistry::from_config(&ProvidersConfig::default());
    assert_eq!(
        registry.get(ProviderKind::Gemini).unwrap().kind(),
        ProviderKind::Gemini
    );
    assert_eq!(
        registry.get(ProviderKind::Ollama).unwrap().kind(),
        ProviderKind::Ollama
    );
}
