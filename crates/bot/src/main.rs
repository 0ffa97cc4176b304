//! Telegram invoice bot.
//!
//! Wires the database, the Telegram client, the PDF renderer, and the
//! conversation orchestrator together, then long-polls for updates and
//! feeds every text message through the flow.

mod config;
mod sender;

use std::time::Duration;

use chrono::Utc;
use database::{conversation, Database};
use orchestrator::{InboundMessage, Orchestrator};
use pdf_render::RenderClient;
use telegram::{BotConfig, TelegramClient, Update, UpdatePoller};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::sender::TelegramSender;

/// How often idle conversations are swept.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Conversations idle for longer than this are dropped by the sweep.
const CLEANUP_MAX_AGE_HOURS: i64 = 24;

/// Pause after a failed poll before trying again.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bot=info".parse().unwrap())
                .add_directive("orchestrator=info".parse().unwrap())
                .add_directive("telegram=info".parse().unwrap())
                .add_directive("database=info".parse().unwrap()),
        )
        .init();

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let client = TelegramClient::new(BotConfig::new(config.bot_token.clone()))?;

    // Token check before entering the poll loop.
    let me = client.get_me().await?;
    info!(
        "Authorized as @{} (id {})",
        me.username.as_deref().unwrap_or(&me.first_name),
        me.id
    );

    let renderer = RenderClient::from_env()?;
    let orchestrator = Orchestrator::new(
        db.clone(),
        TelegramSender::new(client.clone()),
        renderer,
        config.operator_id,
    );

    tokio::spawn(cleanup_loop(db.clone()));

    info!("Invoice bot running (operator {})", config.operator_id);

    let mut poller = UpdatePoller::new(client, config.poll_timeout_secs);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            batch = poller.next_batch() => {
                match batch {
                    Ok(updates) => {
                        for update in updates {
                            handle_update(&orchestrator, update).await;
                        }
                    }
                    Err(e) => {
                        warn!("Polling failed: {}", e);
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                    }
                }
            }
        }
    }

    db.close().await;
    Ok(())
}

/// Route one update into the orchestrator. Updates without a text
/// message are skipped; the poller has already acknowledged them.
async fn handle_update(
    orchestrator: &Orchestrator<TelegramSender, RenderClient>,
    update: Update,
) {
    let Some(message) = update.message else {
        debug!("Skipping update {} with no message", update.update_id);
        return;
    };
    let Some(from) = message.from else {
        debug!("Skipping message {} with no sender", message.message_id);
        return;
    };
    let Some(text) = message.text else {
        debug!("Skipping non-text message {}", message.message_id);
        return;
    };

    let inbound = InboundMessage {
        sender_id: from.id,
        chat_id: message.chat.id,
        text,
    };

    if let Err(e) = orchestrator.process(inbound).await {
        warn!("Failed to process message {}: {}", message.message_id, e);
    }
}

/// Sweep conversations idle past the cutoff, once at startup and then
/// hourly.
async fn cleanup_loop(db: Database) {
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        interval.tick().await;
        let max_age = chrono::Duration::hours(CLEANUP_MAX_AGE_HOURS);
        match conversation::cleanup(db.pool(), Utc::now(), max_age).await {
            Ok(0) => {}
            Ok(removed) => info!("Swept {} idle conversation(s)", removed),
            Err(e) => warn!("Conversation sweep failed: {}", e),
        }
    }
}
