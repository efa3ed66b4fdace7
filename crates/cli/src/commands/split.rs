//! `budgetsplit split`: one-shot split from the stored categories.

use budgetsplit_agent::Outcome;
use budgetsplit_config::AppConfig;
use budgetsplit_core::category::UserId;
use budgetsplit_engine::classifier::parse_amount;

pub async fn run(amount: &str, user: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let amount = parse_amount(amount).ok_or_else(|| format!("Not a number: {amount:?}"))?;

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let assistant = super::build_assistant(&config)?;

    let outcome = assistant.split(&UserId::from(user), amount).await?;
    match &outcome {
        Outcome::Split(result) if json => println!("{}", serde_json::to_string_pretty(result)?),
        Outcome::Split(_) => print!("{}", outcome.reply()),
        _ => return Err(outcome.reply().into()),
    }

    Ok(())
}
