//! Error types for the render client.

use thiserror::Error;

/// Errors that can occur when requesting a PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service reported a rendering failure.
    #[error("render service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
