//! Error types for the ThreadLens protocol layer.

mod channel;
mod provider;
mod settings;

pub use channel::*;
pub use provider::*;
pub use settings::*;
