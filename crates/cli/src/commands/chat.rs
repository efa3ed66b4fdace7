//! `budgetsplit chat`: interactive terminal session.

use std::sync::Arc;

use budgetsplit_agent::run_session;
use budgetsplit_channels::CliChannel;
use budgetsplit_config::AppConfig;

pub async fn run(user: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let assistant = super::build_assistant(&config)?;

    println!("💰 Budget Splitter Assistant: chatting as {user}");
    println!("   Define categories (JSON or YAML) or send an amount.");
    println!("   End a line with \\ to continue a multi-line message. Type 'exit' to quit.\n");

    let channel = Arc::new(CliChannel::new(user));
    run_session(channel, Arc::new(assistant)).await?;

    println!("\nGoodbye!");
    Ok(())
}
