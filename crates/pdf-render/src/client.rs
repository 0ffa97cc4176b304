//! HTTP client for the rendering service.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::types::{ErrorBody, InvoicePayload};

/// Client for requesting rendered invoice PDFs.
#[derive(Debug, Clone)]
pub struct RenderClient {
    http: Client,
    config: RenderConfig,
}

impl RenderClient {
    /// Create a client for the configured service.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RenderError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    ///
    /// See [`RenderConfig::from_env`] for the variables used.
    pub fn from_env() -> Result<Self, RenderError> {
        Self::new(RenderConfig::from_env()?)
    }

    /// Render an invoice, returning the raw PDF bytes.
    ///
    /// A success status carries the document itself; any other status
    /// carries a JSON error body (or, from a gateway, arbitrary text)
    /// which is folded into [`RenderError::Service`].
    pub async fn render(&self, payload: &InvoicePayload) -> Result<Vec<u8>, RenderError> {
        debug!("Requesting PDF for invoice {}", payload.invoice_number);

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(RenderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(ErrorBody {
                    error,
                    details: Some(details),
                }) => format!("{error}: {details}"),
                Ok(ErrorBody { error, .. }) => error,
                Err(_) => body,
            };
            return Err(RenderError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(RenderError::Http)?;
        debug!(
            "Received {} byte PDF for invoice {}",
            bytes.len(),
            payload.invoice_number
        );
        Ok(bytes.to_vec())
    }
}
