//! `budgetsplit run`: Telegram bot runtime.

use std::sync::Arc;

use budgetsplit_agent::run_session;
use budgetsplit_channels::TelegramChannel;
use budgetsplit_config::AppConfig;
use tracing::info;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let credentials = config.require_telegram()?;

    let assistant = super::build_assistant(&config)?
        .with_admin_chat(credentials.admin_id.to_string());

    let telegram = super::telegram_config(&config, credentials.bot_token);
    let channel = Arc::new(TelegramChannel::new(telegram)?);

    println!("💰 Budget Splitter Assistant: starting Telegram bot");
    println!("   Store:    {} ({})", assistant.store().name(), config.store_path().display());
    println!("   Unit:     {}", config.allocation.rounding_unit);
    println!("   Admin:    {}", credentials.admin_id);
    info!(users = assistant.store().users().await?, "Store ready");

    run_session(channel, Arc::new(assistant)).await?;

    info!("Bot stopped");
    Ok(())
}
