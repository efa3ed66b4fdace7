pub mod chat;
pub mod doctor;
pub mod run;
pub mod split;

use std::sync::Arc;

use budgetsplit_agent::BudgetAssistant;
use budgetsplit_channels::TelegramConfig;
use budgetsplit_config::{AppConfig, StoreBackend};
use budgetsplit_core::store::CategoryStore;
use budgetsplit_engine::Allocator;
use budgetsplit_store::{FileStore, InMemoryStore};

/// Build the category store selected in the config.
pub fn build_store(config: &AppConfig) -> Arc<dyn CategoryStore> {
    match config.store.backend {
        StoreBackend::File => Arc::new(FileStore::open(config.store_path())),
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
    }
}

/// Build an assistant over the configured store and rounding unit.
pub fn build_assistant(config: &AppConfig) -> Result<BudgetAssistant, Box<dyn std::error::Error>> {
    let allocator = Allocator::new(config.allocation.rounding_unit)?;
    let mut assistant = BudgetAssistant::new(build_store(config)).with_allocator(allocator);
    if let Some(admin) = config.admin_id {
        assistant = assistant.with_admin_chat(admin.to_string());
    }
    Ok(assistant)
}

/// Telegram channel settings from the config and a bot token.
pub fn telegram_config(config: &AppConfig, bot_token: String) -> TelegramConfig {
    TelegramConfig {
        api_url: config.telegram.api_url.clone(),
        poll_timeout_secs: config.telegram.poll_timeout_secs,
        retry_delay_secs: config.telegram.retry_delay_secs,
        ..TelegramConfig::new(bot_token)
    }
}
