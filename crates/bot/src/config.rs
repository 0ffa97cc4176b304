//! Configuration loaded from environment variables.

use std::env;

/// Bot runtime configuration.
#[derive(Clone)]
pub struct Config {
    /// Bot token issued by BotFather.
    pub bot_token: String,
    /// Telegram user id of the shop operator.
    pub operator_id: i64,
    /// SQLite database URL.
    pub database_url: String,
    /// Long-poll window in seconds.
    pub poll_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TELEGRAM_BOT_TOKEN` | Bot token from BotFather | (required) |
    /// | `OPERATOR_ID` | Telegram user id allowed to use the bot | (required) |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:invoices.db?mode=rwc` |
    /// | `POLL_TIMEOUT_SECS` | Long-poll window in seconds | `30` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").map_err(|_| ConfigError::MissingBotToken)?;

        let operator_id = env::var("OPERATOR_ID")
            .map_err(|_| ConfigError::MissingOperatorId)?
            .parse()
            .map_err(|_| ConfigError::InvalidOperatorId)?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:invoices.db?mode=rwc".to_string());

        let poll_timeout_secs = match env::var("POLL_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPollTimeout)?,
            Err(_) => 30,
        };

        Ok(Self {
            bot_token,
            operator_id,
            database_url,
            poll_timeout_secs,
        })
    }
}

// Token stays out of Debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("operator_id", &self.operator_id)
            .field("database_url", &self.database_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN environment variable is required")]
    MissingBotToken,

    #[error("OPERATOR_ID environment variable is required")]
    MissingOperatorId,

    #[error("OPERATOR_ID must be a numeric Telegram user id")]
    InvalidOperatorId,

    #[error("POLL_TIMEOUT_SECS must be a number of seconds")]
    InvalidPollTimeout,
}
