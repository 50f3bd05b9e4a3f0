//! Data model shared by every ThreadLens context.

mod config;
mod summary;

pub use config::*;
pub use summary::*;
