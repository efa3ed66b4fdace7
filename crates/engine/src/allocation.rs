//! Proportional budget allocation.
//!
//! Splits a total across a category set by weight, rounding every share to
//! a multiple of the rounding unit (100 by default) and reconciling the
//! rounding error against one category so the portions always add up to the
//! rounded total.
//!
//! ```text
//! T     = round(amount)                      half away from zero
//! W     = sum of weights                     must be finite and > 0
//! p_i   = round(T * w_i / W / unit) * unit
//! diff  = T - sum(p_i)                       added to the first category
//! ```
//!
//! The first category is the first one in definition order.

use budgetsplit_core::category::CategorySet;
use budgetsplit_core::error::AllocationError;
use budgetsplit_core::split::{Portion, SplitResult};
use tracing::debug;

/// Default rounding unit: portions are whole hundreds.
pub const DEFAULT_UNIT: i64 = 100;

/// Largest total magnitude whose integer value `f64` represents exactly.
const MAX_TOTAL: f64 = 9_007_199_254_740_992.0;

/// Splits totals across category sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocator {
    unit: i64,
}

impl Default for Allocator {
    fn default() -> Self {
        Self { unit: DEFAULT_UNIT }
    }
}

impl Allocator {
    /// Create an allocator rounding to multiples of `unit`.
    pub fn new(unit: i64) -> Result<Self, AllocationError> {
        if unit < 1 {
            return Err(AllocationError::InvalidUnit(unit));
        }
        Ok(Self { unit })
    }

    pub fn unit(&self) -> i64 {
        self.unit
    }

    /// Split `amount` across `categories`.
    ///
    /// Fails with [`AllocationError::NoCategories`] for an empty set and
    /// [`AllocationError::DegenerateWeights`] when the weights do not sum to
    /// a positive finite number.
    pub fn allocate(
        &self,
        categories: &CategorySet,
        amount: f64,
    ) -> Result<SplitResult, AllocationError> {
        let total = round_total(amount)?;
        let first = categories.first().ok_or(AllocationError::NoCategories)?;

        let weight_sum = categories.total_weight();
        if !weight_sum.is_finite() || weight_sum <= 0.0 {
            return Err(AllocationError::DegenerateWeights { total: weight_sum });
        }

        let unit = self.unit as f64;
        let mut portions = Vec::with_capacity(categories.len());
        let mut sum: i128 = 0;
        for category in categories {
            let raw = total as f64 * (category.weight / weight_sum);
            let rounded = (raw / unit).round() * unit;
            let portion = to_i64(rounded).ok_or(AllocationError::AmountOutOfRange(amount))?;
            sum += i128::from(portion);
            portions.push(Portion {
                category: category.name.clone(),
                amount: portion,
            });
        }

        let diff = i64::try_from(i128::from(total) - sum)
            .map_err(|_| AllocationError::AmountOutOfRange(amount))?;
        portions[0].amount = portions[0]
            .amount
            .checked_add(diff)
            .ok_or(AllocationError::AmountOutOfRange(amount))?;

        debug!(
            total,
            diff,
            adjusted = %first.name,
            categories = portions.len(),
            "Allocated budget"
        );

        Ok(SplitResult {
            total,
            portions,
            adjusted_category: first.name.clone(),
            diff,
        })
    }
}

/// Split with the default rounding unit.
pub fn allocate(categories: &CategorySet, amount: f64) -> Result<SplitResult, AllocationError> {
    Allocator::default().allocate(categories, amount)
}

/// Round to the nearest integer, half away from zero.
fn round_total(amount: f64) -> Result<i64, AllocationError> {
    let rounded = amount.round();
    if !rounded.is_finite() || rounded.abs() > MAX_TOTAL {
        return Err(AllocationError::AmountOutOfRange(amount));
    }
    Ok(rounded as i64)
}

fn to_i64(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    (value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64)
        .then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, f64)]) -> CategorySet {
        pairs.iter().map(|(n, w)| (*n, *w)).collect()
    }

    fn food_rent_other() -> CategorySet {
        set(&[("Food", 50.0), ("Rent", 30.0), ("Other", 20.0)])
    }

    #[test]
    fn exact_split_needs_no_adjustment() {
        let result = allocate(&food_rent_other(), 1000.0).unwrap();
        assert_eq!(result.get("Food"), Some(500));
        assert_eq!(result.get("Rent"), Some(300));
        assert_eq!(result.get("Other"), Some(200));
        assert_eq!(result.diff, 0);
        assert_eq!(result.total, 1000);
    }

    #[test]
    fn small_amount_lands_on_first_category() {
        // 50 / 100 = 0.5 rounds away from zero, so Food already holds 100.
        let result = allocate(&food_rent_other(), 100.0).unwrap();
        assert_eq!(result.get("Food"), Some(100));
        assert_eq!(result.get("Rent"), Some(0));
        assert_eq!(result.get("Other"), Some(0));
        assert_eq!(result.sum(), 100);
    }

    #[test]
    fn remainder_goes_to_first_category() {
        // 625 -> 600, 375 -> 400, 250 -> 300: sum 1300, diff -50.
        let result = allocate(&food_rent_other(), 1250.0).unwrap();
        assert_eq!(result.get("Rent"), Some(400));
        assert_eq!(result.get("Other"), Some(300));
        assert_eq!(result.get("Food"), Some(550));
        assert_eq!(result.diff, -50);
        assert_eq!(result.adjusted_category, "Food");
        assert_eq!(result.sum(), 1250);
    }

    #[test]
    fn first_means_definition_order() {
        let reordered = set(&[("Other", 20.0), ("Rent", 30.0), ("Food", 50.0)]);
        let result = allocate(&reordered, 1250.0).unwrap();
        assert_eq!(result.adjusted_category, "Other");
        assert_eq!(result.get("Food"), Some(600));
        assert_eq!(result.get("Rent"), Some(400));
        assert_eq!(result.get("Other"), Some(250));

        let names: Vec<&str> = result.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(names, vec!["Other", "Rent", "Food"]);
    }

    #[test]
    fn zero_amount_gives_zero_portions() {
        let result = allocate(&food_rent_other(), 0.0).unwrap();
        assert!(result.iter().all(|p| p.amount == 0));
        assert_eq!(result.diff, 0);
    }

    #[test]
    fn fractional_amount_is_rounded_first() {
        let result = allocate(&set(&[("Only", 1.0)]), 123.5).unwrap();
        assert_eq!(result.total, 124);
        assert_eq!(result.get("Only"), Some(124));
        assert_eq!(result.diff, 24);

        let result = allocate(&set(&[("Only", 1.0)]), -0.5).unwrap();
        assert_eq!(result.total, -1);
    }

    #[test]
    fn negative_amount_splits_symmetrically() {
        let result = allocate(&food_rent_other(), -1000.0).unwrap();
        assert_eq!(result.get("Food"), Some(-500));
        assert_eq!(result.get("Rent"), Some(-300));
        assert_eq!(result.get("Other"), Some(-200));
    }

    #[test]
    fn zero_weight_category_gets_nothing() {
        let result = allocate(&set(&[("A", 1.0), ("B", 0.0)]), 1000.0).unwrap();
        assert_eq!(result.get("A"), Some(1000));
        assert_eq!(result.get("B"), Some(0));
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(
            allocate(&CategorySet::new(), 100.0),
            Err(AllocationError::NoCategories)
        );
    }

    #[test]
    fn degenerate_weights_are_rejected() {
        assert!(matches!(
            allocate(&set(&[("A", 0.0), ("B", 0.0)]), 100.0),
            Err(AllocationError::DegenerateWeights { .. })
        ));
        assert!(matches!(
            allocate(&set(&[("A", -5.0), ("B", 2.0)]), 100.0),
            Err(AllocationError::DegenerateWeights { .. })
        ));
        assert!(matches!(
            allocate(&set(&[("A", f64::INFINITY)]), 100.0),
            Err(AllocationError::DegenerateWeights { .. })
        ));
    }

    #[test]
    fn huge_amount_is_rejected() {
        assert_eq!(
            allocate(&food_rent_other(), 1e300),
            Err(AllocationError::AmountOutOfRange(1e300))
        );
        assert!(allocate(&food_rent_other(), f64::NAN).is_err());
    }

    #[test]
    fn custom_unit() {
        let allocator = Allocator::new(10).unwrap();
        let result = allocator.allocate(&food_rent_other(), 125.0).unwrap();
        // 62.5 -> 60, 37.5 -> 40, 25 -> 30: diff -5.
        assert_eq!(result.get("Food"), Some(55));
        assert_eq!(result.get("Rent"), Some(40));
        assert_eq!(result.get("Other"), Some(30));

        assert_eq!(Allocator::new(0), Err(AllocationError::InvalidUnit(0)));
        assert_eq!(Allocator::default().unit(), DEFAULT_UNIT);
    }

    #[test]
    fn portions_always_reconcile() {
        let sets = [
            food_rent_other(),
            set(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]),
            set(&[("A", 0.1), ("B", 0.2), ("C", 0.7), ("D", 0.0)]),
            set(&[("A", 3.0), ("B", 7.0), ("C", 11.0), ("D", 13.0), ("E", 17.0)]),
            set(&[("Solo", 42.0)]),
        ];

        // Deterministic pseudo-random amounts, positive and negative.
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut amounts = vec![0.0, 0.49, 0.5, 49.5, 50.0, 99.99, 149.5, 1e12 + 0.5];
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let magnitude = (seed % 10_000_000) as f64 / 100.0;
            amounts.push(if seed % 2 == 0 { magnitude } else { -magnitude });
        }

        for categories in &sets {
            for &amount in &amounts {
                let result = allocate(categories, amount).unwrap();
                assert_eq!(result.sum(), amount.round() as i64, "amount {amount}");

                let baseline = result.portions[0].amount - result.diff;
                assert_eq!(baseline % DEFAULT_UNIT, 0, "amount {amount}");
                for portion in &result.portions[1..] {
                    assert_eq!(portion.amount % DEFAULT_UNIT, 0, "amount {amount}");
                }
            }
        }
    }
}
