//! Document renderer trait.

use async_trait::async_trait;
use pdf_render::{InvoicePayload, RenderClient};

use crate::error::OrchestratorError;

/// Trait for turning an invoice payload into PDF bytes.
///
/// The production implementation calls the external rendering service;
/// tests substitute a stub.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Render the invoice, returning the document bytes.
    async fn render(&self, payload: &InvoicePayload) -> Result<Vec<u8>, OrchestratorError>;
}

#[async_trait]
impl DocumentRenderer for RenderClient {
    async fn render(&self, payload: &InvoicePayload) -> Result<Vec<u8>, OrchestratorError> {
        RenderClient::render(self, payload)
            .await
            .map_err(|e| OrchestratorError::RenderFailed(e.to_string()))
    }
}
