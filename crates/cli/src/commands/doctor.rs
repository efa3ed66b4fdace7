//! `budgetsplit doctor`: Diagnose configuration and store.

use budgetsplit_channels::TelegramChannel;
use budgetsplit_config::{AppConfig, StoreBackend};
use budgetsplit_core::channel::Channel;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Budget Splitter Doctor: System Diagnostics");
    println!("==============================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ℹ️  No config file at {}, using defaults", config_path.display());
    }
    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    // Check Telegram credentials
    match config.require_telegram() {
        Ok(credentials) => {
            println!("  ✅ Telegram credentials configured");
            match check_bot(&config, credentials.bot_token).await {
                Ok(()) => println!("  ✅ Telegram bot reachable"),
                Err(reason) => {
                    println!("  ❌ Telegram bot unreachable: {reason}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ⚠️  {e} for `budgetsplit run`");
            issues += 1;
        }
    }

    // Check store
    match config.store.backend {
        StoreBackend::Memory => println!("  ✅ In-memory store (categories are not persisted)"),
        StoreBackend::File => {
            let path = config.store_path();
            match std::fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<serde_json::Value>(&content) {
                    Ok(_) => println!("  ✅ Store readable: {}", path.display()),
                    Err(e) => {
                        println!("  ❌ Store at {} is not valid JSON: {e}", path.display());
                        issues += 1;
                    }
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    println!("  ℹ️  No store yet, it will be created at {}", path.display());
                }
                Err(e) => {
                    println!("  ❌ Store at {} unreadable: {e}", path.display());
                    issues += 1;
                }
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Ask the Bot API whether the token is accepted.
async fn check_bot(config: &AppConfig, bot_token: String) -> Result<(), String> {
    let channel = TelegramChannel::new(super::telegram_config(config, bot_token))
        .map_err(|e| e.to_string())?;
    match channel.health_check().await {
        Ok(true) => Ok(()),
        Ok(false) => Err(format!(
            "{} did not answer getMe for this token",
            config.telegram.api_url
        )),
        Err(e) => Err(e.to_string()),
    }
}
