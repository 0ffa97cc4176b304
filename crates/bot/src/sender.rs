//! Telegram-backed implementation of the orchestrator's sender trait.

use async_trait::async_trait;
use orchestrator::{MessageSender, OrchestratorError};
use telegram::TelegramClient;

/// Sends orchestrator output through the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    client: TelegramClient,
}

impl TelegramSender {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), OrchestratorError> {
        self.client
            .send_message(chat_id, text)
            .await
            .map(|_| ())
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }

    async fn send_typing(&self, chat_id: i64) -> Result<(), OrchestratorError> {
        self.client
            .send_chat_action(chat_id, "typing")
            .await
            .map(|_| ())
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }

    async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        data: Vec<u8>,
        caption: &str,
    ) -> Result<Option<String>, OrchestratorError> {
        let message = self
            .client
            .send_document(chat_id, filename, data, Some(caption))
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;

        Ok(message.document.map(|d| d.file_id))
    }
}
