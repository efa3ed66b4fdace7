//! Budget Splitter Assistant CLI: the main entry point.
//!
//! Commands:
//! - `run`: Start the Telegram bot
//! - `chat`: Interactive terminal session
//! - `split`: One-shot split from a user's stored categories
//! - `doctor`: Diagnose configuration and store

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "budgetsplit",
    about = "Budget Splitter Assistant: split amounts across weighted categories",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot (requires TELEGRAM_BOT_TOKEN and ADMIN_TELEGRAM_ID)
    Run,

    /// Chat with the assistant in the terminal
    Chat {
        /// User ID the typed messages belong to
        #[arg(short, long, default_value = "local_user")]
        user: String,
    },

    /// Split an amount across a user's stored categories
    Split {
        /// Amount to split
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// User whose categories to use
        #[arg(short, long)]
        user: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and store
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run => commands::run::run().await?,
        Commands::Chat { user } => commands::chat::run(user).await?,
        Commands::Split { amount, user, json } => commands::split::run(&amount, user, json).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
