//! User-facing reply texts.

use std::fmt::Write as _;

use budgetsplit_core::category::CategorySet;
use budgetsplit_core::split::SplitResult;
use budgetsplit_engine::DefinitionFormat;

const EXAMPLES: &str = "Example:\nJSON:\n{\"Food\": 50, \"Rent\": 30, \"Other\": 20}\n\
                        YAML:\nFood: 50\nRent: 30\nOther: 20";

const USAGE: &str = "Send a number to split your budget based on your categories, \
                     or upload categories in JSON or YAML format.";

pub const FEEDBACK_EMPTY: &str = "Please provide feedback text.";
pub const FEEDBACK_SENT: &str = "Feedback sent, thank you!";
pub const FEEDBACK_UNAVAILABLE: &str = "Feedback is not available right now.";
pub const INTERNAL_ERROR: &str = "Something went wrong while handling your message. Please try again.";

pub fn welcome() -> String {
    format!(
        "Welcome to Budget Splitter Assistant.\n{USAGE}\n\
         To send feedback, type: /feedback <your message>."
    )
}

pub fn help() -> String {
    format!("{USAGE}\n{EXAMPLES}")
}

pub fn no_categories() -> String {
    format!("No categories set. Please upload categories using JSON or YAML.\n{EXAMPLES}")
}

pub fn amount_out_of_range(amount: f64) -> String {
    format!("The amount {amount} is too large to split.")
}

pub fn categories_updated(format: DefinitionFormat) -> String {
    format!("Categories updated successfully via {format}.")
}

/// `Budget split:` followed by one `name: amount` line per category.
pub fn split(result: &SplitResult) -> String {
    let mut out = String::from("Budget split:\n");
    for portion in result.iter() {
        let _ = writeln!(out, "{}: {}", portion.category, portion.amount);
    }
    out
}

pub fn category_list(categories: &CategorySet) -> String {
    let mut out = String::from("Your categories:\n");
    for category in categories {
        let _ = writeln!(out, "{}: {}", category.name, format_weight(category.weight));
    }
    out
}

pub fn feedback_relay(sender_name: &str, sender_id: &str, text: &str) -> String {
    format!("Feedback from {sender_name} (ID: {sender_id}):\n{text}")
}

/// Whole weights print without a trailing `.0`.
fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 && weight.abs() < 1e15 {
        format!("{}", weight as i64)
    } else {
        format!("{weight}")
    }
}
