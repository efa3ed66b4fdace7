//! Error types for the budget split domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type.

use std::path::PathBuf;
use thiserror::Error;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),

    #[error("Platform API error: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Storing zero categories would silently clear the user's set.
    #[error("Refusing to store an empty category set for user {user_id}")]
    EmptyCategorySet { user_id: String },

    /// NaN or infinite weights cannot be split and do not survive JSON.
    #[error("Category {category} of user {user_id} has a non-finite weight")]
    NonFiniteWeight { user_id: String, category: String },

    #[error("Failed to persist store to {path}: {reason}")]
    PersistFailed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("No categories configured")]
    NoCategories,

    #[error("Category weights must sum to a positive number (got {total})")]
    DegenerateWeights { total: f64 },

    #[error("Amount {0} cannot be represented as a whole-number total")]
    AmountOutOfRange(f64),

    #[error("Rounding unit must be at least 1 (got {0})")]
    InvalidUnit(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_displays_user() {
        let err = StoreError::EmptyCategorySet {
            user_id: "42".into(),
        };
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("empty"));

        let err = StoreError::NonFiniteWeight {
            user_id: "42".into(),
            category: "Food".into(),
        };
        assert!(err.to_string().contains("Food"));
    }

    #[test]
    fn allocation_error_displays_total() {
        let err = AllocationError::DegenerateWeights { total: -3.0 };
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn channel_api_error_displays_status() {
        let err = ChannelError::Api {
            status_code: 401,
            message: "Unauthorized".into(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Unauthorized"));
    }
}
