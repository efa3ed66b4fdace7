//! Channel trait: the abstraction over chat platforms.
//!
//! A Channel connects the assistant to a messaging platform (Telegram, the
//! local terminal). It receives messages from users and sends replies back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::category::UserId;
use crate::error::ChannelError;

/// A message received from a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Sender identifier (platform-specific user ID)
    pub sender_id: UserId,

    /// Human-readable sender name (if available)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,

    /// The chat/DM identifier replies should go to
    pub chat_id: String,

    /// The text content
    pub content: String,
}

impl ChannelMessage {
    pub fn new(
        sender_id: impl Into<UserId>,
        chat_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            sender_name: None,
            chat_id: chat_id.into(),
            content: content.into(),
        }
    }

    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }
}

/// The core Channel trait.
///
/// Implementations handle platform-specific connection logic and message
/// formatting.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name (e.g., "telegram", "cli").
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    ///
    /// Returns a receiver that yields incoming messages. The channel
    /// implementation handles polling internally.
    async fn start(
        &self,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<ChannelMessage, ChannelError>>,
        ChannelError,
    >;

    /// Send a text message to a specific chat.
    async fn send(&self, chat_id: &str, content: &str) -> std::result::Result<(), ChannelError>;

    /// Stop the channel gracefully.
    async fn stop(&self) -> std::result::Result<(), ChannelError> {
        Ok(())
    }

    /// Health check: is the channel connected and operational?
    async fn health_check(&self) -> std::result::Result<bool, ChannelError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_message_creation() {
        let msg = ChannelMessage::new(12345_i64, "67890", "Food: 50").with_sender_name("alice");
        assert_eq!(msg.sender_id.as_str(), "12345");
        assert_eq!(msg.sender_name.as_deref(), Some("alice"));
        assert_eq!(msg.content, "Food: 50");
    }

    #[test]
    fn channel_message_serialization_skips_missing_name() {
        let msg = ChannelMessage::new("1", "1", "100");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("sender_name"));
    }
}
