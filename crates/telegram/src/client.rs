//! Bot API HTTP client.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::BotConfig;
use crate::error::TelegramError;
use crate::types::{
    ApiResponse, GetUpdatesParams, Message, SendChatActionParams, SendMessageParams, Update, User,
};

/// Default per-request timeout for plain API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Slack added on top of the long-poll window before the HTTP request
/// itself is abandoned.
const POLL_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: BotConfig,
}

impl TelegramClient {
    /// Create a client for the given bot.
    pub fn new(config: BotConfig) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the bot's own identity. Useful as a startup token check.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates at or above `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout_secs,
        };
        let request_timeout = Duration::from_secs(timeout_secs) + POLL_TIMEOUT_MARGIN;
        self.call_with_timeout("getUpdates", &params, Some(request_timeout))
            .await
    }

    /// Send a plain text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        let params = SendMessageParams {
            chat_id,
            text: text.to_string(),
        };
        self.call("sendMessage", &params).await
    }

    /// Show a chat action ("typing", "upload_document", ...) for a few
    /// seconds. Best-effort; failures are the caller's call to ignore.
    pub async fn send_chat_action(
        &self,
        chat_id: i64,
        action: &str,
    ) -> Result<bool, TelegramError> {
        let params = SendChatActionParams {
            chat_id,
            action: action.to_string(),
        };
        self.call("sendChatAction", &params).await
    }

    /// Upload a document from memory, with an optional caption.
    ///
    /// Returns the resulting message; its `document.file_id` can be
    /// stored to re-send the file later without another upload.
    pub async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        data: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<Message, TelegramError> {
        let url = self.config.method_url("sendDocument");
        debug!("API call: sendDocument ({} bytes)", data.len());

        let part = Part::bytes(data).file_name(filename.to_string());
        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(TelegramError::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(TelegramError::Http)?;
        decode_response(status, &body)
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R, TelegramError> {
        self.call_with_timeout(method, params, None).await
    }

    /// Make a Bot API call. Log lines carry the method name only; the
    /// full URL embeds the token.
    async fn call_with_timeout<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
        timeout: Option<Duration>,
    ) -> Result<R, TelegramError> {
        let url = self.config.method_url(method);
        debug!("API call: {}", method);

        let mut request = self.http.post(&url).json(params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(TelegramError::Http)?;
        let status = response.status();
        let body = response.text().await.map_err(TelegramError::Http)?;
        decode_response(status, &body)
    }
}

/// Unwrap the `{ok, result, description, error_code}` envelope.
///
/// The API reports its own errors inside the envelope even on non-2xx
/// statuses; only bodies that are not the envelope at all (gateway
/// errors and the like) fall through to a connection error.
fn decode_response<R: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<R, TelegramError> {
    let envelope: ApiResponse<R> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            if !status.is_success() {
                return Err(TelegramError::Connection(format!("HTTP {status}: {body}")));
            }
            return Err(TelegramError::Json(e));
        }
    };

    if !envelope.ok {
        return Err(TelegramError::Api {
            code: envelope.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
            description: envelope
                .description
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    envelope
        .result
        .ok_or_else(|| TelegramError::InvalidResponse("no result in response".to_string()))
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ok_envelope() {
        let body = r#"{"ok": true, "result": true}"#;
        let value: bool = decode_response(StatusCode::OK, body).unwrap();
        assert!(value);
    }

    #[test]
    fn test_decode_api_error() {
        let body = r#"{"ok": false, "error_code": 403, "description": "Forbidden: bot was blocked"}"#;
        let result: Result<bool, _> = decode_response(StatusCode::FORBIDDEN, body);
        match result {
            Err(TelegramError::Api { code, description }) => {
                assert_eq!(code, 403);
                assert!(description.contains("blocked"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_gateway_error_body() {
        let body = "<html>502 Bad Gateway</html>";
        let result: Result<bool, _> = decode_response(StatusCode::BAD_GATEWAY, body);
        assert!(matches!(result, Err(TelegramError::Connection(_))));
    }

    #[test]
    fn test_decode_ok_without_result() {
        let body = r#"{"ok": true}"#;
        let result: Result<bool, _> = decode_response(StatusCode::OK, body);
        assert!(matches!(result, Err(TelegramError::InvalidResponse(_))));
    }
}
