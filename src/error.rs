use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Winston
#[derive(Error, Debug)]
pub enum WinstonError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Knowledge base id not present in the registry
    #[error("Unknown knowledge base '{id}' (known: {})", known.join(", "))]
    UnknownKnowledgeBase { id: String, known: Vec<String> },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Ingestion errors (unreadable export, unrecognised XML)
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// HTTP errors while fetching remote sources
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for Winston operations
pub type Result<T> = std::result::Result<T, WinstonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kb_message_lists_known_ids() {
        let err = WinstonError::UnknownKnowledgeBase {
            id: "ghost".to_string(),
            known: vec!["default".to_string(), "werule".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Unknown knowledge base 'ghost' (known: default, werule)"
        );
    }
}
