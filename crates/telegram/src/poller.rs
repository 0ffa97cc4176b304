//! Long-polling update source.

use tracing::debug;

use crate::client::TelegramClient;
use crate::error::TelegramError;
use crate::types::Update;

/// Pulls update batches and tracks the acknowledgement offset.
///
/// Each successful batch advances the offset past the highest update id
/// seen, so the API stops redelivering them. Batches are returned in
/// update id order for the caller to process one at a time.
#[derive(Debug)]
pub struct UpdatePoller {
    client: TelegramClient,
    offset: Option<i64>,
    timeout_secs: u64,
}

impl UpdatePoller {
    /// Create a poller with the given long-poll window.
    pub fn new(client: TelegramClient, timeout_secs: u64) -> Self {
        Self {
            client,
            offset: None,
            timeout_secs,
        }
    }

    /// Long-poll the next batch of updates.
    ///
    /// Blocks up to the poll window and returns an empty batch on
    /// timeout. Errors leave the offset untouched, so nothing is lost
    /// to a transient failure.
    pub async fn next_batch(&mut self) -> Result<Vec<Update>, TelegramError> {
        let mut updates = self
            .client
            .get_updates(self.offset, self.timeout_secs)
            .await?;

        updates.sort_by_key(|u| u.update_id);

        if let Some(last) = updates.last() {
            self.offset = Some(last.update_id + 1);
            debug!(
                "Received {} update(s), offset now {}",
                updates.len(),
                last.update_id + 1
            );
        }

        Ok(updates)
    }

    /// The next update id that will be requested.
    pub fn offset(&self) -> Option<i64> {
        self.offset
    }
}
