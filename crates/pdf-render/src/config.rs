//! Configuration for the render client.

use std::env;

use crate::error::RenderError;

/// Configuration for the PDF rendering service.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Full endpoint URL that accepts the invoice payload.
    pub endpoint: String,

    /// Request timeout in seconds. Rendering a one-page invoice is
    /// quick; anything past this is a stuck service.
    pub timeout_secs: u64,
}

impl RenderConfig {
    /// Create configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: 30,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `PDF_RENDER_URL` - Endpoint URL of the rendering service
    ///
    /// Optional environment variables:
    /// - `PDF_RENDER_TIMEOUT_SECS` - Request timeout (default: 30)
    pub fn from_env() -> Result<Self, RenderError> {
        let endpoint = env::var("PDF_RENDER_URL")
            .map_err(|_| RenderError::Config("PDF_RENDER_URL not set".to_string()))?;

        let timeout_secs = env::var("PDF_RENDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            endpoint,
            timeout_secs,
        })
    }
}
