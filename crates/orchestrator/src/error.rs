//! Error types for orchestrator operations.

use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur during orchestration.
///
/// Most user mistakes never become errors; they are answered with a
/// corrective reply and the turn ends normally. What surfaces here is
/// infrastructure: the store, the transport, or the renderer.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// State store or invoice persistence failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Message or document sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// PDF rendering failed.
    #[error("render failed: {0}")]
    RenderFailed(String),
}
