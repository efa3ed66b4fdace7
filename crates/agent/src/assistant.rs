//! The budget assistant: turns one inbound message into outbound replies.

use std::sync::Arc;

use budgetsplit_core::category::{CategorySet, UserId};
use budgetsplit_core::channel::ChannelMessage;
use budgetsplit_core::error::{AllocationError, StoreError};
use budgetsplit_core::split::SplitResult;
use budgetsplit_core::store::CategoryStore;
use budgetsplit_engine::{Allocator, Classification, DefinitionFormat, classify};
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::replies;

/// What a piece of user text did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The user's category set was replaced.
    CategoriesUpdated {
        format: DefinitionFormat,
        categories: CategorySet,
    },
    /// The amount was split across the stored set.
    Split(SplitResult),
    /// An amount arrived but the user has no usable category set.
    NoCategories,
    /// The amount is too large to split exactly.
    AmountOutOfRange(f64),
    /// Neither a definition nor an amount.
    Unrecognized,
}

impl Outcome {
    /// The reply text shown to the user.
    pub fn reply(&self) -> String {
        match self {
            Outcome::CategoriesUpdated { format, .. } => replies::categories_updated(*format),
            Outcome::Split(result) => replies::split(result),
            Outcome::NoCategories => replies::no_categories(),
            Outcome::AmountOutOfRange(amount) => replies::amount_out_of_range(*amount),
            Outcome::Unrecognized => replies::help(),
        }
    }
}

/// A message to deliver to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub chat_id: String,
    pub text: String,
}

impl Outbound {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
        }
    }
}

/// Handles user messages against a shared category store.
pub struct BudgetAssistant {
    store: Arc<dyn CategoryStore>,
    allocator: Allocator,
    /// Chat that receives `/feedback` relays.
    admin_chat: Option<String>,
}

impl BudgetAssistant {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self {
            store,
            allocator: Allocator::default(),
            admin_chat: None,
        }
    }

    /// Use a custom allocator (rounding unit).
    pub fn with_allocator(mut self, allocator: Allocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Relay feedback to this chat.
    pub fn with_admin_chat(mut self, chat_id: impl Into<String>) -> Self {
        self.admin_chat = Some(chat_id.into());
        self
    }

    pub fn store(&self) -> &Arc<dyn CategoryStore> {
        &self.store
    }

    /// Classify `text` from `user` and act on it.
    ///
    /// A definition replaces the user's set; an amount is split across the
    /// stored set. Only store failures are errors.
    pub async fn process(&self, user: &UserId, text: &str) -> Result<Outcome, StoreError> {
        match classify(text) {
            Classification::Categories { categories, format } => {
                self.store.set(user, categories.clone()).await?;
                info!(
                    user_id = %user,
                    format = %format,
                    categories = categories.len(),
                    "Updated categories"
                );
                Ok(Outcome::CategoriesUpdated { format, categories })
            }
            Classification::Amount(amount) => self.split(user, amount).await,
            Classification::Unrecognized => {
                debug!(user_id = %user, "Unrecognized input");
                Ok(Outcome::Unrecognized)
            }
        }
    }

    /// Split `amount` across the user's stored categories.
    pub async fn split(&self, user: &UserId, amount: f64) -> Result<Outcome, StoreError> {
        let Some(categories) = self.store.get(user).await? else {
            info!(user_id = %user, "Split requested without categories");
            return Ok(Outcome::NoCategories);
        };

        match self.allocator.allocate(&categories, amount) {
            Ok(result) => {
                info!(
                    user_id = %user,
                    total = result.total,
                    diff = result.diff,
                    adjusted = %result.adjusted_category,
                    "Processed budget split"
                );
                Ok(Outcome::Split(result))
            }
            Err(AllocationError::AmountOutOfRange(amount)) => {
                info!(user_id = %user, amount, "Amount out of range");
                Ok(Outcome::AmountOutOfRange(amount))
            }
            Err(e) => {
                warn!(user_id = %user, error = %e, "Stored categories cannot be split");
                Ok(Outcome::NoCategories)
            }
        }
    }

    /// Handle one inbound message and return the replies to send.
    pub async fn handle(&self, msg: &ChannelMessage) -> Vec<Outbound> {
        info!(
            user_id = %msg.sender_id,
            sender = msg.sender_name.as_deref().unwrap_or(""),
            chars = msg.content.chars().count(),
            "Received message"
        );

        if let Some(command) = Command::parse(&msg.content) {
            debug!(command = command.name(), "Dispatching command");
            return self.handle_command(command, msg).await;
        }

        let text = match self.process(&msg.sender_id, &msg.content).await {
            Ok(outcome) => outcome.reply(),
            Err(e) => {
                warn!(user_id = %msg.sender_id, error = %e, "Failed to handle message");
                replies::INTERNAL_ERROR.to_string()
            }
        };
        vec![Outbound::new(&msg.chat_id, text)]
    }

    async fn handle_command(&self, command: Command, msg: &ChannelMessage) -> Vec<Outbound> {
        let reply = |text: String| vec![Outbound::new(&msg.chat_id, text)];

        match command {
            Command::Start => reply(replies::welcome()),
            Command::Help => reply(replies::help()),
            Command::Categories => match self.store.get(&msg.sender_id).await {
                Ok(Some(categories)) => reply(replies::category_list(&categories)),
                Ok(None) => reply(replies::no_categories()),
                Err(e) => {
                    warn!(user_id = %msg.sender_id, error = %e, "Failed to read categories");
                    reply(replies::INTERNAL_ERROR.to_string())
                }
            },
            Command::Feedback(text) => {
                if text.trim().is_empty() {
                    debug!(user_id = %msg.sender_id, "Feedback command without text");
                    return reply(replies::FEEDBACK_EMPTY.to_string());
                }
                let Some(admin) = &self.admin_chat else {
                    warn!("Feedback received but no admin chat is configured");
                    return reply(replies::FEEDBACK_UNAVAILABLE.to_string());
                };

                let name = msg.sender_name.as_deref().unwrap_or("unknown");
                info!(user_id = %msg.sender_id, "Forwarding feedback to admin");
                vec![
                    Outbound::new(
                        admin,
                        replies::feedback_relay(name, msg.sender_id.as_str(), &text),
                    ),
                    Outbound::new(&msg.chat_id, replies::FEEDBACK_SENT),
                ]
            }
        }
    }
}
