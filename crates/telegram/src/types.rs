//! Bot API request and response types.
//!
//! Only the slice of the API the bot uses: text updates in, text and
//! document messages out. Field names follow the wire format, which is
//! already snake_case.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API method returns.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Payload when `ok` is true.
    #[serde(default = "none")]
    pub result: Option<T>,
    /// Human-readable error when `ok` is false.
    #[serde(default)]
    pub description: Option<String>,
    /// Numeric error code when `ok` is false.
    #[serde(default)]
    pub error_code: Option<i64>,
}

// `#[serde(default)]` on `result` would require `T: Default`.
fn none<T>() -> Option<T> {
    None
}

/// An incoming update from long polling.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonically increasing update id.
    pub update_id: i64,
    /// The message, for message updates.
    #[serde(default)]
    pub message: Option<Message>,
}

/// A Telegram message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message id within the chat.
    pub message_id: i64,
    /// Sender, absent for channel posts.
    #[serde(default)]
    pub from: Option<User>,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Text content, absent for media-only messages.
    #[serde(default)]
    pub text: Option<String>,
    /// Attached document, present on sendDocument results.
    #[serde(default)]
    pub document: Option<Document>,
    /// Unix timestamp.
    pub date: i64,
}

/// A Telegram user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Unique user id.
    pub id: i64,
    /// Whether this account is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// First name.
    pub first_name: String,
    /// Username, if set.
    #[serde(default)]
    pub username: Option<String>,
}

/// A chat (only the id is needed here).
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Unique chat id.
    pub id: i64,
}

/// An uploaded document, as echoed back by sendDocument.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// File id usable for re-sending without re-uploading.
    pub file_id: String,
    /// Original filename, if known.
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Parameters for getUpdates.
#[derive(Debug, Serialize)]
pub struct GetUpdatesParams {
    /// First update id to return; acknowledges everything below it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Long-poll timeout in seconds.
    pub timeout: u64,
}

/// Parameters for sendMessage.
#[derive(Debug, Serialize)]
pub struct SendMessageParams {
    pub chat_id: i64,
    pub text: String,
}

/// Parameters for sendChatAction.
#[derive(Debug, Serialize)]
pub struct SendChatActionParams {
    pub chat_id: i64,
    /// Action name, e.g. "typing" or "upload_document".
    pub action: String,
}
