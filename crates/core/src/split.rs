//! Split results produced by the allocation engine.

use serde::{Deserialize, Serialize};

/// One category's share of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portion {
    pub category: String,
    pub amount: i64,
}

/// The outcome of splitting a total across a category set.
///
/// Portions are listed in the category set's definition order and always
/// sum to `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    /// The rounded, authoritative total.
    pub total: i64,

    /// Per-category portions.
    pub portions: Vec<Portion>,

    /// Category that absorbed the rounding remainder.
    pub adjusted_category: String,

    /// Remainder added to `adjusted_category` (may be zero or negative).
    pub diff: i64,
}

impl SplitResult {
    /// Look up the portion for a category.
    pub fn get(&self, category: &str) -> Option<i64> {
        self.portions
            .iter()
            .find(|p| p.category == category)
            .map(|p| p.amount)
    }

    /// Sum of all portions.
    pub fn sum(&self) -> i64 {
        self.portions.iter().map(|p| p.amount).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Portion> {
        self.portions.iter()
    }
}
