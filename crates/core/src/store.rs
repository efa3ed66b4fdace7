//! CategoryStore trait: per-user category persistence.
//!
//! The store is the sole owner of every user's [`CategorySet`]. It is built
//! once at startup and shared with the session handler; there is no
//! process-wide global.

use async_trait::async_trait;

use crate::category::{CategorySet, UserId};
use crate::error::StoreError;

/// The core CategoryStore trait.
///
/// Implementations: file-backed JSON document, in-memory (for testing).
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// The backend name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Get the category set for a user, if one has been defined.
    async fn get(&self, user: &UserId) -> std::result::Result<Option<CategorySet>, StoreError>;

    /// Replace the category set for a user.
    ///
    /// Must reject what [`check_storable`] rejects and leave any existing
    /// set untouched.
    async fn set(&self, user: &UserId, categories: CategorySet)
        -> std::result::Result<(), StoreError>;

    /// Number of users with a stored category set.
    async fn users(&self) -> std::result::Result<usize, StoreError>;
}

/// Reject sets a store must never hold: empty ones and ones with NaN or
/// infinite weights.
pub fn check_storable(user: &UserId, categories: &CategorySet) -> Result<(), StoreError> {
    if categories.is_empty() {
        return Err(StoreError::EmptyCategorySet {
            user_id: user.to_string(),
        });
    }
    if let Some(category) = categories.non_finite() {
        return Err(StoreError::NonFiniteWeight {
            user_id: user.to_string(),
            category: category.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storable_sets() {
        let user = UserId::from("1");
        let ok: CategorySet = [("Food", 50.0), ("Zero", 0.0)].into_iter().collect();
        assert!(check_storable(&user, &ok).is_ok());

        assert!(matches!(
            check_storable(&user, &CategorySet::new()),
            Err(StoreError::EmptyCategorySet { .. })
        ));

        let nan: CategorySet = [("Food", f64::NAN)].into_iter().collect();
        assert!(matches!(
            check_storable(&user, &nan),
            Err(StoreError::NonFiniteWeight { category, .. }) if category == "Food"
        ));
    }
}
