//! Conversation state store, keyed by operator user id.
//!
//! Each row carries the stage tag plus the draft invoice as JSON. Writes
//! replace the whole document; there is no field-level merging.

use chrono::{DateTime, Duration, Utc};
use invoice_core::{InvoiceDraft, Stage};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Conversation;

/// Typed view of a stored conversation row.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationState {
    /// Current stage of the invoice flow.
    pub stage: Stage,
    /// Draft accumulated so far.
    pub draft: InvoiceDraft,
}

/// Get the current state for a user, decoding stage and draft.
///
/// Returns `Ok(None)` when the user has no active conversation. A row
/// whose stage tag or draft JSON fails to decode is an error, not a
/// silent reset.
pub async fn get_state(pool: &SqlitePool, user_id: i64) -> Result<Option<ConversationState>> {
    let row = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT user_id, stage, data, created_at, updated_at
        FROM conversations
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let stage: Stage = row
        .stage
        .parse()
        .map_err(|_| DatabaseError::InvalidRecord {
            entity: "Conversation",
            id: user_id.to_string(),
            reason: format!("unknown stage {:?}", row.stage),
        })?;
    let draft: InvoiceDraft = serde_json::from_str(&row.data)?;

    Ok(Some(ConversationState { stage, draft }))
}

/// Create or replace the state for a user.
pub async fn set_state(
    pool: &SqlitePool,
    user_id: i64,
    stage: Stage,
    draft: &InvoiceDraft,
) -> Result<()> {
    let data = serde_json::to_string(draft)?;

    sqlx::query(
        r#"
        INSERT INTO conversations (user_id, stage, data)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            stage = excluded.stage,
            data = excluded.data,
            updated_at = datetime('now')
        "#,
    )
    .bind(user_id)
    .bind(stage.as_str())
    .bind(&data)
    .execute(pool)
    .await?;

    Ok(())
}

/// Clear the state for a user. Succeeds whether or not a row existed.
pub async fn clear_state(pool: &SqlitePool, user_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete conversations idle for longer than `max_age`, returning the
/// number of rows removed.
pub async fn cleanup(pool: &SqlitePool, now: DateTime<Utc>, max_age: Duration) -> Result<u64> {
    let cutoff = (now - max_age).format("%Y-%m-%d %H:%M:%S").to_string();

    let result = sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE updated_at < ?
        "#,
    )
    .bind(&cutoff)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
