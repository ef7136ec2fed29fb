// src/error.rs

//! Unified error handling for the release poller.

use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Fingerprint extraction failure.
///
/// Raised by the pure extractors when a page or asset body no longer
/// carries the expected structural signature.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// No asset script tags matched in the entry page body.
    #[error("no asset script tags matched in page body")]
    NoScriptTags,

    /// The main asset body carries no release build marker.
    #[error("no release build marker found in asset body")]
    NoBuildMarker,
}

/// Failure while fetching build information for a channel.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Entry page responded with something other than HTTP 200.
    #[error("unexpectedly got http {status} fetching {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Network-level timeout. Recovered by immediate retry in the poller.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Fingerprint extraction failed on a fetched body.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl FetchError {
    /// Classify a transport error, separating timeouts from other failures.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err)
        }
    }

    /// Whether this error is a recoverable network timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// A destination-local notification delivery failure.
///
/// Caught and logged by the fan-out; never escalates past it.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct DeliveryError(String);

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<serde_json::Error> for DeliveryError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Build fetch failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
