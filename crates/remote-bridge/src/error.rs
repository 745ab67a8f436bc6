//! Error types for the bridge.

use bridge_config::ConfigError;
use thiserror::Error;

/// Bridge error type.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration or credentials error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No bytes, not even a keep-alive, arrived within the idle timeout
    #[error("No stream data for {0:?}, connection presumed dead")]
    Idle(std::time::Duration),

    /// Non-success response from the database
    #[error("Database returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Malformed stream event
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Security rules no longer allow reading the listened path
    #[error("Stream cancelled by the database: {0}")]
    Cancelled(String),

    /// The credential used to open the stream expired or was revoked
    #[error("Credential revoked by the database")]
    AuthRevoked,
}

impl BridgeError {
    /// Errors that reopening the stream with the same credential cannot fix.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Cancelled(_) | Self::AuthRevoked | Self::Config(_))
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
