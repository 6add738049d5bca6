use thiserror::Error;

/// A3S Pack error types
#[derive(Error, Debug)]
pub enum PackError {
    /// A required image label is absent
    #[error("could not find label '{label}'")]
    MissingLabel { label: String },

    /// A label is present but its value does not decode into the expected shape
    #[error("failed to decode label '{label}': {source}")]
    LabelDecode {
        label: String,
        #[source]
        source: serde_json::Error,
    },

    /// Opening a module's layer failed
    #[error("extracting {kind} '{module}' layer (diffID '{diff_id}'): {source}")]
    LayerFetch {
        kind: String,
        module: String,
        diff_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The package holds no layer with the given diffID
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    /// Configuration requires a main module but none matched
    #[error("Main module not found: {module}")]
    MainModuleNotFound { module: String },

    /// OCI image error
    #[error("OCI image error: {0}")]
    OciImageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for PackError {
    fn from(err: serde_yaml::Error) -> Self {
        PackError::SerializationError(err.to_string())
    }
}

/// Result type alias for A3S Pack operations
pub type Result<T> = std::result::Result<T, PackError>;
