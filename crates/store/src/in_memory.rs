//! In-memory store: useful for testing and ephemeral sessions.

use async_trait::async_trait;
use budgetsplit_core::category::{CategorySet, UserId};
use budgetsplit_core::error::StoreError;
use budgetsplit_core::store::{CategoryStore, check_storable};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory store that keeps category sets in a HashMap.
/// Useful for testing and sessions where persistence isn't needed.
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<UserId, CategorySet>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn get(&self, user: &UserId) -> Result<Option<CategorySet>, StoreError> {
        Ok(self.users.read().await.get(user).cloned())
    }

    async fn set(&self, user: &UserId, categories: CategorySet) -> Result<(), StoreError> {
        check_storable(user, &categories)?;
        self.users.write().await.insert(user.clone(), categories);
        Ok(())
    }

    async fn users(&self) -> Result<usize, StoreError> {
        Ok(self.users.read().await.len())
    }
}
