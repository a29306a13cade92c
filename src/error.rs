//! Error types for Case Copilot.

use std::time::Duration;

/// Top-level error type for the copilot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workbench error: {0}")]
    Workbench(#[from] WorkbenchError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failures talking to the assistant endpoint.
///
/// The session controller never surfaces these to its caller; they are
/// rendered into an assistant-role error message instead.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Assistant endpoint returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Invalid response from assistant endpoint: {reason}")]
    InvalidResponse { reason: String },
}

/// Why a `send` was refused before any request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendRejected {
    #[error("query is empty")]
    EmptyQuery,

    #[error("a query is already in flight")]
    InFlight,

    #[error("no suggestion at index {index}")]
    NoSuchSuggestion { index: usize },
}

/// Case workbench errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkbenchError {
    #[error("Case {case_number} not found")]
    CaseNotFound { case_number: String },

    #[error("Failed to read case file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse case data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for the copilot.
pub type Result<T> = std::result::Result<T, Error>;
