//! A3S Pack Core - Foundational Types
//!
//! Error, configuration and logging types shared by the A3S Pack crates.

pub mod config;
pub mod error;
pub mod log;

// Re-export commonly used types
pub use config::{ExtractConfig, LogLevel, BUILDPACK_LAYERS_LABEL, METADATA_LABEL};
pub use error::{PackError, Result};

/// A3S Pack version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
