//! Error types for the core domain.

use thiserror::Error;

/// Error returned when a stored stage string is not a known stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown conversation stage: {0}")]
pub struct ParseStageError(pub String);

/// Errors from the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A quantity entry references a product position that does not exist
    /// in the draft. The draft is corrupt and the conversation must restart.
    #[error("quantity entry references product {index} but only {count} products are in the draft")]
    InvalidProductIndex { index: usize, count: usize },
}
