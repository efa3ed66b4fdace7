//! CLI channel: interactive terminal-based session.
//!
//! Reads lines from stdin as messages from a single local user and prints
//! replies to stdout. Used for `budgetsplit chat`.

use async_trait::async_trait;
use budgetsplit_core::category::UserId;
use budgetsplit_core::channel::{Channel, ChannelMessage};
use budgetsplit_core::error::ChannelError;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Chat ID used for the local terminal session.
pub const CLI_CHAT_ID: &str = "cli_session";

/// Interactive CLI channel for terminal-based sessions.
pub struct CliChannel {
    user: UserId,
}

impl CliChannel {
    /// Messages typed into the terminal are attributed to `user`.
    pub fn new(user: impl Into<UserId>) -> Self {
        Self { user: user.into() }
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new("local_user")
    }
}

/// Whether a typed line ends the session.
fn is_exit_command(line: &str) -> bool {
    matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q")
}

/// Format a reply for the terminal. Replies addressed to another chat
/// (feedback relayed to the admin) are labelled with their recipient.
fn render_reply(chat_id: &str, content: &str) -> String {
    if chat_id == CLI_CHAT_ID {
        content.to_string()
    } else {
        format!("[to {chat_id}] {content}")
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        let (tx, rx) = mpsc::channel(32);
        let user = self.user.clone();

        tokio::spawn(async move {
            let stdin = io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            // Multi-line YAML cannot be typed as one line, so a lone `\`
            // at the end of a line continues the message.
            let mut pending = String::new();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(partial) = line.strip_suffix('\\') {
                            pending.push_str(partial);
                            pending.push('\n');
                            continue;
                        }
                        pending.push_str(&line);
                        let content = std::mem::take(&mut pending);

                        let trimmed = content.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        if is_exit_command(trimmed) {
                            break;
                        }

                        let msg = ChannelMessage::new(user.clone(), CLI_CHAT_ID, content)
                            .with_sender_name("local");

                        if tx.send(Ok(msg)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF (Ctrl+D)
                    Err(e) => {
                        let _ = tx.send(Err(ChannelError::ConnectionLost(e.to_string()))).await;
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, chat_id: &str, content: &str) -> Result<(), ChannelError> {
        println!("{}", render_reply(chat_id, content));
        Ok(())
    }
}
