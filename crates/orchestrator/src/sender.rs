//! Message sender trait and implementations.

use async_trait::async_trait;

use crate::error::OrchestratorError;

/// Trait for sending replies and documents to the operator's chat.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a plain text reply.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), OrchestratorError>;

    /// Show a typing indicator while the turn is being processed.
    async fn send_typing(&self, chat_id: i64) -> Result<(), OrchestratorError>;

    /// Deliver a document with a caption.
    ///
    /// Returns the transport's file reference when it provides one, so
    /// the document can be re-sent later without re-uploading.
    async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        data: Vec<u8>,
        caption: &str,
    ) -> Result<Option<String>, OrchestratorError>;
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_text(&self, _chat_id: i64, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn send_typing(&self, _chat_id: i64) -> Result<(), OrchestratorError> {
        Ok(())
    }

    async fn send_document(
        &self,
        _chat_id: i64,
        _filename: &str,
        _data: Vec<u8>,
        _caption: &str,
    ) -> Result<Option<String>, OrchestratorError> {
        Ok(None)
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("Sending to {}: {}", chat_id, text);
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<(), OrchestratorError> {
        tracing::info!("Typing indicator for {}", chat_id);
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        data: Vec<u8>,
        caption: &str,
    ) -> Result<Option<String>, OrchestratorError> {
        tracing::info!(
            "Sending document {} ({} bytes) to {}: {}",
            filename,
            data.len(),
            chat_id,
            caption
        );
        Ok(None)
    }
}
