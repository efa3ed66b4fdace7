//! Chat channel implementations for the budget split assistant.
//!
//! Each channel connects to a chat platform and relays messages to/from
//! the session handler.
//!
//! Available channels:
//! - **Telegram**: Telegram Bot API via long polling
//! - **CLI**: Interactive terminal session (stdin/stdout)

pub mod cli;
pub mod telegram;

pub use cli::{CLI_CHAT_ID, CliChannel};
pub use telegram::{TelegramChannel, TelegramConfig};
