use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PackError, Result};

/// Label carrying the package's own module identity.
pub const METADATA_LABEL: &str = "io.buildpacks.buildpackage.metadata";

/// Label carrying the identifier → version → layer info mapping.
pub const BUILDPACK_LAYERS_LABEL: &str = "io.buildpacks.buildpack.layers";

/// Module extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Label holding the main module metadata
    pub metadata_label: String,

    /// Label holding the module layers mapping
    pub layers_label: String,

    /// Fail when no layer entry matches the declared main module
    pub require_main: bool,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            metadata_label: METADATA_LABEL.to_string(),
            layers_label: BUILDPACK_LAYERS_LABEL.to_string(),
            require_main: false,
            log_level: LogLevel::Warn,
        }
    }
}

impl ExtractConfig {
    /// Load configuration from a YAML or JSON file.
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PackError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot address a label.
    pub fn validate(&self) -> Result<()> {
        if self.metadata_label.trim().is_empty() {
            return Err(PackError::ConfigError(
                "metadata_label must not be empty".to_string(),
            ));
        }
        if self.layers_label.trim().is_empty() {
            return Err(PackError::ConfigError(
                "layers_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}
