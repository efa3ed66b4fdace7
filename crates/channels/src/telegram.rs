//! Telegram channel adapter.
//!
//! Talks to the Telegram Bot API directly over HTTPS:
//! - `getMe` for health checks
//! - `getUpdates` long polling for inbound messages
//! - `sendMessage` for replies
//!
//! Polling runs in a background task that feeds the receiver returned by
//! [`Channel::start`]. Network failures are logged and retried after a fixed
//! delay; an authentication failure ends the stream.

use async_trait::async_trait;
use budgetsplit_core::channel::{Channel, ChannelMessage};
use budgetsplit_core::error::ChannelError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Telegram rejects messages longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Telegram channel configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub bot_token: String,
    /// Bot API base URL.
    pub api_url: String,
    /// Long-polling timeout for `getUpdates`.
    pub poll_timeout_secs: u64,
    /// Delay before retrying a failed poll.
    pub retry_delay_secs: u64,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_url: "https://api.telegram.org".into(),
            poll_timeout_secs: 60,
            retry_delay_secs: 3,
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .finish()
    }
}

// ── Bot API types ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl TelegramUser {
    /// `@username` when set, otherwise the first name.
    pub fn display_name(&self) -> Option<String> {
        self.username
            .clone()
            .or_else(|| self.first_name.clone())
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

// ── HTTP client ──────────────────────────────────────────────────────────

/// Thin Bot API client, cheap to clone into the polling task.
#[derive(Clone)]
struct BotApi {
    client: reqwest::Client,
    base_url: String,
    poll_timeout_secs: u64,
}

impl BotApi {
    fn new(config: &TelegramConfig) -> Result<Self, ChannelError> {
        // The HTTP timeout must outlast the long-poll timeout.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 15))
            .build()
            .map_err(|e| ChannelError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: method_base(&config.api_url, &config.bot_token),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, ChannelError> {
        let url = format!("{}/{}", self.base_url, method);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionLost(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let parsed: ApiResponse<T> = response.json().await.map_err(|e| {
            ChannelError::InvalidPayload(format!("{method} response (status {status}): {e}"))
        })?;

        if !parsed.ok {
            return Err(ChannelError::Api {
                status_code: parsed.error_code.unwrap_or(status),
                message: parsed.description.unwrap_or_else(|| "unknown error".into()),
            });
        }

        parsed
            .result
            .ok_or_else(|| ChannelError::InvalidPayload(format!("{method} returned no result")))
    }

    async fn get_me(&self) -> Result<TelegramUser, ChannelError> {
        self.call("getMe", serde_json::json!({})).await
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<TelegramUpdate>, ChannelError> {
        self.call(
            "getUpdates",
            serde_json::json!({
                "offset": offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                serde_json::json!({ "chat_id": chat_id, "text": text }),
            )
            .await?;
        Ok(())
    }
}

fn method_base(api_url: &str, token: &str) -> String {
    format!("{}/bot{}", api_url.trim_end_matches('/'), token)
}

/// Convert a batch of updates into channel messages.
///
/// Returns the messages and the offset for the next `getUpdates` call.
/// Updates that carry no message are skipped; messages without text
/// (stickers, photos) are delivered with empty content.
pub fn process_updates(
    updates: Vec<TelegramUpdate>,
    offset: i64,
) -> (Vec<ChannelMessage>, i64) {
    let mut next_offset = offset;
    let mut messages = Vec::with_capacity(updates.len());

    for update in updates {
        next_offset = next_offset.max(update.update_id + 1);

        let Some(message) = update.message else {
            debug!(update_id = update.update_id, "Skipping update without message");
            continue;
        };

        let (sender_id, sender_name) = match &message.from {
            Some(user) => (user.id, user.display_name()),
            None => (message.chat.id, None),
        };

        messages.push(ChannelMessage {
            sender_id: sender_id.into(),
            sender_name,
            chat_id: message.chat.id.to_string(),
            content: message.text.unwrap_or_default(),
        });
    }

    (messages, next_offset)
}

/// Split text into chunks Telegram will accept, preferring line breaks.
pub fn chunk_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

async fn poll_loop(
    api: BotApi,
    tx: mpsc::Sender<Result<ChannelMessage, ChannelError>>,
    retry_delay: Duration,
) {
    let mut offset = 0;
    loop {
        match api.get_updates(offset).await {
            Ok(updates) => {
                let (messages, next_offset) = process_updates(updates, offset);
                offset = next_offset;
                for message in messages {
                    if tx.send(Ok(message)).await.is_err() {
                        return; // Receiver dropped
                    }
                }
            }
            Err(ChannelError::Api {
                status_code: 401,
                message,
            }) => {
                let _ = tx
                    .send(Err(ChannelError::Api {
                        status_code: 401,
                        message,
                    }))
                    .await;
                return;
            }
            Err(e) => {
                if tx.is_closed() {
                    return;
                }
                warn!(error = %e, retry_in_secs = retry_delay.as_secs(), "Telegram poll failed");
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}

/// Telegram channel adapter.
pub struct TelegramChannel {
    config: TelegramConfig,
    api: BotApi,
    poller: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Result<Self, ChannelError> {
        if config.bot_token.trim().is_empty() {
            return Err(ChannelError::NotConfigured("Telegram bot token is empty".into()));
        }
        let api = BotApi::new(&config)?;
        Ok(Self {
            config,
            api,
            poller: tokio::sync::Mutex::new(None),
        })
    }

    /// Fetch the bot's own account (`getMe`).
    pub async fn get_me(&self) -> Result<TelegramUser, ChannelError> {
        self.api.get_me().await
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        let me = self.api.get_me().await?;
        info!(
            account = %me.display_name().unwrap_or_default(),
            "Authorized on Telegram"
        );

        let (tx, rx) = mpsc::channel(64);
        let retry_delay = Duration::from_secs(self.config.retry_delay_secs);
        let handle = tokio::spawn(poll_loop(self.api.clone(), tx, retry_delay));

        if let Some(previous) = self.poller.lock().await.replace(handle) {
            previous.abort();
        }
        Ok(rx)
    }

    async fn send(&self, chat_id: &str, content: &str) -> Result<(), ChannelError> {
        for chunk in chunk_message(content, MAX_MESSAGE_CHARS) {
            self.api
                .send_message(chat_id, &chunk)
                .await
                .map_err(|e| ChannelError::DeliveryFailed {
                    channel: "telegram".into(),
                    reason: e.to_string(),
                })?;
        }
        debug!(chat_id = %chat_id, content_len = content.len(), "Telegram message sent");
        Ok(())
    }

    async fn stop(&self) -> Result<(), ChannelError> {
        info!("Telegram channel stopping");
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ChannelError> {
        Ok(self.api.get_me().await.is_ok())
    }
}
