//! Settings commands: install seeding, provider configuration, prompt and
//! status. Configuration goes through the panel controller so the CLI tests
//! and saves exactly like the panel does.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::warn;

use threadlens_config::{
    load_api_configuration, load_prompt_template, seed_install_defaults, AppConfig,
    ConfigValidator,
};
use threadlens_panel::PanelController;
use threadlens_protocols::settings::SettingsStore;
use threadlens_runtime::{ContextKind, ExtensionBus};

use crate::cli::ConfigureAction;

fn panel(config: &AppConfig, store: Arc<dyn SettingsStore>) -> PanelController {
    let bus = ExtensionBus::new();
    let (handle, _inbox) = bus.register_context(ContextKind::Panel);
    PanelController::new(store, &config.providers, Arc::new(handle))
}

/// Show only the tail of a credential.
fn mask(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}

pub(crate) async fn init(store: Arc<dyn SettingsStore>) -> Result<()> {
    let seeded = seed_install_defaults(store.as_ref()).await?;
    if seeded.is_empty() {
        println!("Settings already initialized.");
    }
    for key in seeded {
        println!("Seeded {}", key);
    }
    Ok(())
}

pub(crate) async fn configure(
    config: &AppConfig,
    store: Arc<dyn SettingsStore>,
    action: ConfigureAction,
) -> Result<()> {
    let panel = panel(config, store);
    panel.load_settings().await?;

    match action {
        ConfigureAction::Gemini { api_key, model } => {
            panel.set_api_key(api_key);
            let models = panel.test_gemini().await?;
            println!("Connection successful!");

            match model {
                Some(model) => {
                    if !models.contains(&model) {
                        warn!("Model {} was not offered for this key", model);
                    }
                    panel.select_model(model);
                    panel.save_gemini_config().await?;
                    println!("Configuration saved!");
                }
                None => {
                    println!("Available models:");
                    for name in models {
                        println!("  {}", name);
                    }
                    println!("Re-run with --model <name> to save.");
                }
            }
        }
        ConfigureAction::Ollama { endpoint, model } => {
            panel.set_ollama_endpoint(endpoint);
            if let Some(model) = model {
                panel.set_openai_model(model);
            }
            panel.save_ollama_config().await?;
            println!("Connection successful!");
        }
    }
    Ok(())
}

pub(crate) async fn prompt(
    config: &AppConfig,
    store: Arc<dyn SettingsStore>,
    template: String,
) -> Result<()> {
    let panel = panel(config, store);
    panel.set_prompt_template(template);
    panel.save_prompt().await?;
    println!("Prompt template saved successfully");
    Ok(())
}

pub(crate) async fn status(
    config: &AppConfig,
    store: Arc<dyn SettingsStore>,
    format: &str,
) -> Result<()> {
    let api = load_api_configuration(store.as_ref(), &config.providers).await?;
    let prompt = load_prompt_template(store.as_ref()).await?;
    let credential = api.credential().map(mask);

    match format {
        "json" => {
            let value = json!({
                "provider": api.provider,
                "credential": credential,
                "model": api.model,
                "endpoint": api.endpoint(),
                "openaiCompatible": api.is_openai_compatible(),
                "verified": api.verified,
                "promptTemplate": prompt,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => {
            println!("{:<12} {}", "Provider", api.provider);
            println!("{:<12} {}", "API key", credential.as_deref().unwrap_or("-"));
            println!("{:<12} {}", "Model", api.model);
            println!("{:<12} {}", "Endpoint", api.endpoint().unwrap_or("-"));
            println!("{:<12} {}", "Verified", api.verified);
            println!("{:<12} {}", "Prompt", if prompt.is_empty() { "-" } else { prompt.as_str() });
        }
    }

    let result = ConfigValidator::validate_api_configuration(&api);
    for error in &result.errors {
        warn!("{}: {}", error.path, error.message);
    }
    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    Ok(())
}
