//! Telegram Bot API client library.
//!
//! This crate provides a small Rust client for the Bot API over HTTP.
//! It supports:
//!
//! - Receiving message updates via long polling
//! - Sending text messages and chat actions
//! - Uploading documents with captions
//!
//! # Example
//!
//! ```no_run
//! use telegram::{BotConfig, TelegramClient, UpdatePoller};
//!
//! # async fn example() -> Result<(), telegram::TelegramError> {
//! let config = BotConfig::new("12345:secret-token");
//! let client = TelegramClient::new(config)?;
//!
//! // Verify the token before polling
//! let me = client.get_me().await?;
//! println!("Running as @{}", me.username.unwrap_or_default());
//!
//! let mut poller = UpdatePoller::new(client.clone(), 50);
//! loop {
//!     for update in poller.next_batch().await? {
//!         if let Some(message) = update.message {
//!             if let Some(text) = &message.text {
//!                 client.send_message(message.chat.id, text).await?;
//!             }
//!         }
//!     }
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod types;

pub use client::TelegramClient;
pub use config::BotConfig;
pub use error::TelegramError;
pub use poller::UpdatePoller;
pub use types::{ApiResponse, Chat, Document, Message, Update, User};
