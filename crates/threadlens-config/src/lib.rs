//! # ThreadLens Config
//!
//! Static application configuration (TOML) and the persistent settings
//! store the panel writes and the coordinator reads.

mod error;
mod loader;
mod schema;
mod validator;

pub mod settings;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use settings::{
    is_config_verified, load_api_configuration, load_prompt_template, seed_install_defaults,
    JsonFileSettingsStore, MemorySettingsStore,
};
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
