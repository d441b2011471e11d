//! Error types for qr-dispatch.

use crate::pipeline::types::Category;

/// Top-level error type for the scanning shell.
///
/// The classification pipeline itself is total and never returns this;
/// it only surfaces at the edges (configuration, stdin, JSON framing).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid frame: {0}")]
    Frame(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// A structured payload whose mini-format did not fully match.
///
/// Recovered locally: the affected fields default to empty strings and the
/// diagnostic rides along on the scan result. Never propagated as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadDiagnostic {
    #[error("{category} payload is missing its {expected:?} prefix")]
    MissingPrefix {
        category: Category,
        expected: &'static str,
    },

    #[error("{category} payload has no {field} field")]
    MissingField {
        category: Category,
        field: &'static str,
    },

    #[error("Email payload is neither a mailto: URI nor a MATMSG record")]
    UnrecognizedEmailFormat,
}

/// Result type alias for the shell.
pub type Result<T> = std::result::Result<T, Error>;
