//! Typed reads and writes over any [`SettingsStore`].

use serde_json::Value;
use tracing::{debug, info};

use threadlens_protocols::error::SettingsError;
use threadlens_protocols::settings::{keys, SettingsMap, SettingsStore};
use threadlens_protocols::types::{
    ApiConfiguration, ProviderKind, DEFAULT_PROMPT_TEMPLATE,
};

use crate::schema::ProvidersConfig;

fn string_value(values: &SettingsMap, key: &str) -> Option<String> {
    values
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

/// Read the provider configuration, filling model defaults from `providers`.
pub async fn load_api_configuration(
    store: &dyn SettingsStore,
    providers: &ProvidersConfig,
) -> Result<ApiConfiguration, SettingsError> {
    let values = store
        .get(&[
            keys::API_PROVIDER,
            keys::GEMINI_API_KEY,
            keys::GEMINI_MODEL,
            keys::OLLAMA_ENDPOINT,
            keys::OPENAI_MODEL,
            keys::CONFIG_VERIFIED,
        ])
        .await?;

    let provider = match string_value(&values, keys::API_PROVIDER) {
        Some(raw) => raw
            .parse::<ProviderKind>()
            .map_err(|message| SettingsError::InvalidValue {
                key: keys::API_PROVIDER.to_string(),
                message,
            })?,
        None => ProviderKind::default(),
    };

    let model = match provider {
        ProviderKind::Gemini => string_value(&values, keys::GEMINI_MODEL)
            .unwrap_or_else(|| providers.gemini.default_model.clone()),
        ProviderKind::Ollama => string_value(&values, keys::OPENAI_MODEL)
            .unwrap_or_else(|| providers.ollama.default_openai_model.clone()),
    };

    Ok(ApiConfiguration {
        provider,
        credential: string_value(&values, keys::GEMINI_API_KEY),
        model,
        endpoint_url: string_value(&values, keys::OLLAMA_ENDPOINT),
        verified: values
            .get(keys::CONFIG_VERIFIED)
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

/// The stored prompt template, empty when none is stored.
pub async fn load_prompt_template(store: &dyn SettingsStore) -> Result<String, SettingsError> {
    let values = store.get(&[keys::PROMPT_TEMPLATE]).await?;
    Ok(string_value(&values, keys::PROMPT_TEMPLATE).unwrap_or_default())
}

/// The `configVerified` gate; absent means not verified.
pub async fn is_config_verified(store: &dyn SettingsStore) -> Result<bool, SettingsError> {
    let values = store.get(&[keys::CONFIG_VERIFIED]).await?;
    Ok(values
        .get(keys::CONFIG_VERIFIED)
        .and_then(Value::as_bool)
        .unwrap_or(false))
}

/// Seed install-time defaults without overwriting anything already stored.
///
/// Returns the keys that were written.
pub async fn seed_install_defaults(
    store: &dyn SettingsStore,
) -> Result<Vec<&'static str>, SettingsError> {
    let values = store
        .get(&[keys::PROMPT_TEMPLATE, keys::CONFIG_VERIFIED])
        .await?;

    let mut seed = SettingsMap::new();
    if string_value(&values, keys::PROMPT_TEMPLATE).is_none() {
        seed.insert(
            keys::PROMPT_TEMPLATE.to_string(),
            Value::from(DEFAULT_PROMPT_TEMPLATE),
        );
    }
    if !values.contains_key(keys::CONFIG_VERIFIED) {
        seed.insert(keys::CONFIG_VERIFIED.to_string(), Value::Bool(false));
    }

    if seed.is_empty() {
        debug!("Install defaults already present");
        return Ok(Vec::new());
    }

    let mut seeded: Vec<&'static str> = [keys::PROMPT_TEMPLATE, keys::CONFIG_VERIFIED]
        .into_iter()
        .filter(|k| seed.contains_key(*k))
        .collect();
    seeded.sort_unstable();

    store.set(seed).await?;
    info!("Seeded install defaults: {:?}", seeded);
    Ok(seeded)
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
