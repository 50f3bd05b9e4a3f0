//! ThreadLens - Google Docs comment thread summarizer
//!
//! Main entry point. Every extension context (coordinator, panel, content
//! script) runs in this process and talks over the in-process extension bus.

mod cli;
mod cmd_settings;
mod cmd_summarize;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use threadlens_config::{AppConfig, ConfigLoader, ConfigValidator, JsonFileSettingsStore};
use threadlens_protocols::settings::SettingsStore;

use cli::{Cli, Commands};
use cmd_summarize::SummarizeArgs;

/// Get the .threadlens directory path.
fn threadlens_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".threadlens"))
        .unwrap_or_else(|| PathBuf::from(".threadlens"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.threadlens/logs/ with daily rotation.
fn init_tracing() -> Result<()> {
    let log_dir = threadlens_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("threadlens")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The writer stops flushing once the guard drops.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the configuration file (defaults when absent) and validate it.
fn load_config(path: &Path) -> Result<AppConfig> {
    let config = ConfigLoader::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    let result = ConfigValidator::validate(&config);
    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if !result.is_valid() {
        let errors: Vec<String> = result
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        bail!("Invalid configuration: {}", errors.join("; "));
    }
    Ok(config)
}

async fn open_store(config: &AppConfig, path: Option<PathBuf>) -> Result<Arc<dyn SettingsStore>> {
    let path = path.unwrap_or_else(|| config.storage.resolved_settings_path());
    debug!("Settings file: {}", path.display());
    let store = JsonFileSettingsStore::open(path.clone())
        .await
        .with_context(|| format!("Failed to open settings at {}", path.display()))?;
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let store = open_store(&config, cli.settings).await?;

    match cli.command {
        Commands::Init => cmd_settings::init(store).await,
        Commands::Configure { provider } => cmd_settings::configure(&config, store, provider).await,
        Commands::Prompt { template } => cmd_settings::prompt(&config, store, template).await,
        Commands::Status { format } => cmd_settings::status(&config, store, &format).await,
        Commands::Summarize {
            page,
            click,
            url,
            timeout,
            focus,
        } => {
            let args = SummarizeArgs {
                page,
                click,
                url,
                timeout: Duration::from_secs(timeout),
                focus,
            };
            cmd_summarize::run(config, store, args).await
        }
    }
}
