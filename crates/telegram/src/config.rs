//! Configuration types for the Telegram client.

/// Configuration for talking to the Bot API.
#[derive(Clone)]
pub struct BotConfig {
    /// Base URL of the Bot API server (e.g., "https://api.telegram.org").
    pub api_base: String,
    /// Bot token issued by BotFather. Part of every request URL, so it
    /// must never be logged.
    pub token: String,
}

impl BotConfig {
    /// Create a new configuration with the default API server.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            token: token.into(),
        }
    }

    /// Create configuration against a custom API server (e.g., a local
    /// Bot API instance).
    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    /// Get the URL for a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }
}

// Token stays out of Debug output; log lines carry config structs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish()
    }
}
