//! Error types for asknotes.
//!
//! `AskError` is what the proxy endpoint can fail with; every variant maps to
//! a status code and a message that is safe to hand back to the browser.
//! `Error` covers everything else (storage, configuration, serialization).

use axum::http::StatusCode;
use thiserror::Error;

/// Failures of a single `/api/ask` exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    /// Non-POST request.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The request carried no usable query. No upstream call is made.
    #[error("Missing query")]
    InvalidRequest,

    /// The upstream service reported an error of its own.
    #[error("{0}")]
    Upstream(String),

    /// The upstream call succeeded but produced no answer text.
    #[error("No answer from OpenRouter")]
    EmptyAnswer,

    /// Transport or parse failure. The cause is logged, never returned.
    #[error("Server error")]
    Server,
}

/// Fallback message when the upstream error object has no message.
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "OpenRouter error";

impl AskError {
    /// Build an upstream error, falling back to a generic message.
    #[must_use]
    pub fn upstream(message: Option<&str>) -> Self {
        match message {
            Some(m) if !m.is_empty() => Self::Upstream(m.to_string()),
            _ => Self::Upstream(UPSTREAM_FALLBACK_MESSAGE.to_string()),
        }
    }

    /// HTTP status for this error kind.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidRequest | Self::Upstream(_) => StatusCode::BAD_REQUEST,
            Self::EmptyAnswer | Self::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// The main error type for everything outside the proxy exchange.
#[derive(Error, Debug)]
pub enum Error {
    /// The sled database could not be opened or written.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An outbound HTTP request failed before a body was read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for asknotes operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}
