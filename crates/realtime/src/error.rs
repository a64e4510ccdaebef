//! Error types for the realtime client crate.

use thiserror::Error;

/// Result type alias for realtime client operations.
pub type Result<T> = std::result::Result<T, RealtimeError>;

/// Errors raised by the API client and the push channel.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the backend
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The push channel could not be opened
    #[error("Connect error: {0}")]
    Connect(String),

    /// The push channel broke while open
    #[error("Channel error: {0}")]
    Channel(String),
}

impl RealtimeError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect(message.into())
    }

    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel(message.into())
    }
}
