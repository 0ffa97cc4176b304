//! Conversation orchestration for the invoice bot.
//!
//! This crate provides the [`Orchestrator`] type, which drives the staged
//! invoice dialogue: each incoming message is interpreted against the
//! operator's stored stage, the draft advances (or re-prompts), and on
//! confirmation the invoice is numbered, persisted, rendered, and the PDF
//! delivered back through the [`MessageSender`].
//!
//! # Architecture
//!
//! ```text
//! Telegram update (from the bot's polling loop)
//!          │
//! ┌────────▼────────────────────────────────────────────┐
//! │                   ORCHESTRATOR                      │
//! │                                                     │
//! │  1. Authorize sender, show typing indicator         │
//! │  2. Handle /start /new /cancel /help from any stage │
//! │  3. Load stage + draft from the database            │
//! │  4. Run the stage handler:                          │
//! │     customer info → products → quantities →         │
//! │     delivery → discount → confirmation              │
//! │  5. On OK: number + persist, render PDF, deliver    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use orchestrator::{InboundMessage, LoggingSender, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = database::Database::connect("sqlite:invoices.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let renderer = pdf_render::RenderClient::from_env()?;
//!     let orchestrator = Orchestrator::new(db, LoggingSender, renderer, 123456789);
//!
//!     orchestrator
//!         .process(InboundMessage {
//!             sender_id: 123456789,
//!             chat_id: 123456789,
//!             text: "/start".to_string(),
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

mod error;
mod orchestrator;
mod renderer;
pub mod replies;
mod sender;

pub use error::OrchestratorError;
pub use orchestrator::{InboundMessage, Orchestrator};
pub use renderer::DocumentRenderer;
pub use replies::{HELP_TEXT, WELCOME};
pub use sender::{LoggingSender, MessageSender, NoOpSender};
