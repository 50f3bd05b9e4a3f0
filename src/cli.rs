//! CLI definitions for ThreadLens.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ThreadLens CLI.
#[derive(Parser)]
#[command(name = "threadlens")]
#[command(about = "Summarize Google Docs comment threads with Gemini or Ollama")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Settings file, overriding `storage.settings_path`
    #[arg(long, env = "THREADLENS_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Seed install-time defaults into the settings store
    Init,

    /// Test and save a provider configuration
    Configure {
        #[command(subcommand)]
        provider: ConfigureAction,
    },

    /// Save the prompt template
    Prompt {
        /// Prompt placed before the comment thread
        template: String,
    },

    /// Show the stored configuration
    Status {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Click a comment in a saved document page and print the panel
    Summarize {
        /// Saved HTML of the document page
        #[arg(long)]
        page: PathBuf,

        /// CSS selector of the element to click
        #[arg(long)]
        click: String,

        /// URL the page was saved from
        #[arg(long, default_value = "https://docs.google.com/document/d/local/edit")]
        url: String,

        /// Seconds to wait for the summary
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Ask the page to scroll back to the summarized thread afterwards
        #[arg(long)]
        focus: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigureAction {
    /// Hosted Gemini API
    Gemini {
        #[arg(long, env = "GEMINI_API_KEY")]
        api_key: String,

        /// Model to save; without it the available models are listed
        #[arg(long)]
        model: Option<String>,
    },

    /// Self-hosted Ollama endpoint; a `/v1` suffix selects the OpenAI-compatible API
    Ollama {
        #[arg(long)]
        endpoint: String,

        /// Chat model, required for `/v1` endpoints
        #[arg(long)]
        model: Option<String>,
    },
}
