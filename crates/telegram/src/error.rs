//! Error types for the Telegram client.

use thiserror::Error;

/// Errors that can occur when talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body failed to decode.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the Bot API.
    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },

    /// Connection or gateway failure outside the API envelope.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Envelope said ok but carried no result.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
