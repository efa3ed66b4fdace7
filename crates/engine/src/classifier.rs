//! Input classification.
//!
//! Raw message text is tried against an ordered list of candidate parsers:
//!
//! ```text
//! 1. JSON   {"Food": 50, "Rent": 30}      -> category definition
//! 2. YAML   Food: 50\nRent: 30            -> category definition
//! 3. number 1500.75                       -> split request
//! ```
//!
//! The first parser that succeeds wins. A definition only counts when it
//! yields at least one category, so `{}` falls through to the next parser.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use budgetsplit_core::category::CategorySet;
use regex_lite::Regex;
use tracing::debug;

/// The serialization a category definition was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Yaml,
}

impl DefinitionFormat {
    pub fn label(&self) -> &'static str {
        match self {
            DefinitionFormat::Json => "JSON",
            DefinitionFormat::Yaml => "YAML",
        }
    }
}

impl fmt::Display for DefinitionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a piece of user text turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// A non-empty category definition.
    Categories {
        categories: CategorySet,
        format: DefinitionFormat,
    },
    /// A request to split this amount.
    Amount(f64),
    /// Nothing we understand.
    Unrecognized,
}

/// A candidate parser for category definitions.
type DefinitionParser = fn(&str) -> Option<CategorySet>;

/// Definition parsers in priority order.
const DEFINITION_PARSERS: [(DefinitionFormat, DefinitionParser); 2] = [
    (DefinitionFormat::Json, parse_json),
    (DefinitionFormat::Yaml, parse_yaml),
];

/// Classify raw user text. Pure: never touches the store.
pub fn classify(text: &str) -> Classification {
    let text = text.trim();

    for (format, parser) in DEFINITION_PARSERS {
        if let Some(categories) = parser(text) {
            return Classification::Categories { categories, format };
        }
    }

    match parse_amount(text) {
        Some(amount) => Classification::Amount(amount),
        None => Classification::Unrecognized,
    }
}

/// Parse a JSON object of `name -> number`.
pub fn parse_json(text: &str) -> Option<CategorySet> {
    match serde_json::from_str::<CategorySet>(text) {
        Ok(set) if !set.is_empty() => Some(set),
        Ok(_) => {
            debug!("JSON definition has no categories");
            None
        }
        Err(e) => {
            debug!(error = %e, "Not a JSON category definition");
            None
        }
    }
}

/// Parse a YAML mapping of `name -> number`, after [`normalize_yaml`].
pub fn parse_yaml(text: &str) -> Option<CategorySet> {
    let normalized = normalize_yaml(text);
    match serde_yaml::from_str::<CategorySet>(&normalized) {
        Ok(set) if !set.is_empty() => Some(set),
        Ok(_) => {
            debug!("YAML definition has no categories");
            None
        }
        Err(e) => {
            debug!(error = %e, "Not a YAML category definition");
            None
        }
    }
}

static COLON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\d)").expect("static pattern is valid"));

/// Insert a space after every colon directly followed by a digit.
///
/// `Food:50` is a single plain scalar to a YAML parser; `Food: 50` is a
/// mapping entry. Text that is already spaced is returned unchanged.
pub fn normalize_yaml(text: &str) -> Cow<'_, str> {
    COLON_DIGIT.replace_all(text, ": ${1}")
}

/// Parse the whole text as a finite decimal number.
///
/// Accepts an optional sign, fraction, and exponent. Currency symbols,
/// thousands separators and expressions are rejected.
pub fn parse_amount(text: &str) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
