//! File-based category store: a single JSON document on disk.
//!
//! The whole store is one document mapping user IDs to their ordered
//! category sets:
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2026-01-01T00:00:00Z",
//!   "users": { "12345": { "Food": 50.0, "Rent": 30.0 } }
//! }
//! ```
//!
//! The bare `{ "<user>": { "<name>": <weight> } }` layout is accepted on load
//! as well, so caches written before the versioned envelope existed keep
//! working.
//!
//! Storage location: `~/.budgetsplit/categories.json` unless configured.

use async_trait::async_trait;
use budgetsplit_core::category::{CategorySet, UserId};
use budgetsplit_core::error::StoreError;
use budgetsplit_core::store::{CategoryStore, check_storable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Current version of the on-disk document.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct StoreDocument<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    users: BTreeMap<&'a UserId, &'a CategorySet>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLayout {
    Versioned {
        version: u32,
        #[serde(default)]
        saved_at: Option<DateTime<Utc>>,
        users: HashMap<UserId, CategorySet>,
    },
    Legacy(HashMap<UserId, CategorySet>),
}

/// A file-backed category store.
///
/// The document is loaded into memory on creation and rewritten on every
/// successful `set`. Reads never touch the disk.
pub struct FileStore {
    path: PathBuf,
    users: Arc<RwLock<HashMap<UserId, CategorySet>>>,
    /// Serializes writers so an older snapshot never lands after a newer one.
    persist_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at the given path.
    ///
    /// A missing file starts an empty store (the file is created on first
    /// write). Unreadable or malformed content is logged and also starts
    /// empty; it is never fatal.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let users = Self::load_from_disk(&path);
        info!(path = %path.display(), users = users.len(), "Category store loaded");
        Self {
            path,
            users: Arc::new(RwLock::new(users)),
            persist_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> HashMap<UserId, CategorySet> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No category store found, starting fresh");
                return HashMap::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read category store, starting empty");
                return HashMap::new();
            }
        };

        let users = match serde_json::from_str::<StoredLayout>(&content) {
            Ok(StoredLayout::Versioned {
                version,
                saved_at,
                users,
            }) => {
                if version > FORMAT_VERSION {
                    warn!(version, supported = FORMAT_VERSION, "Category store written by a newer version");
                }
                debug!(version, saved_at = ?saved_at, "Decoded versioned category store");
                users
            }
            Ok(StoredLayout::Legacy(users)) => {
                debug!("Decoded legacy category store layout");
                users
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error decoding category store, starting empty");
                return HashMap::new();
            }
        };

        users
            .into_iter()
            .filter(|(user, set)| {
                if set.is_empty() {
                    warn!(user_id = %user, "Skipping empty category set in store");
                }
                !set.is_empty()
            })
            .collect()
    }

    /// Write the whole store to disk, replacing the previous document.
    ///
    /// The document goes to a sibling temporary file first and is then
    /// renamed over the target, so readers never see a partial write.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let _guard = self.persist_lock.lock().await;

        let content = {
            let users = self.users.read().await;
            let document = StoreDocument {
                version: FORMAT_VERSION,
                saved_at: Utc::now(),
                users: users.iter().collect(),
            };
            serde_json::to_string_pretty(&document).map_err(|e| StoreError::PersistFailed {
                path: self.path.clone(),
                reason: format!("serialization failed: {e}"),
            })?
        };

        write_atomically(&self.path, &content).map_err(|e| StoreError::PersistFailed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

fn write_atomically(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, content)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

#[async_trait]
impl CategoryStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, user: &UserId) -> Result<Option<CategorySet>, StoreError> {
        Ok(self.users.read().await.get(user).cloned())
    }

    async fn set(&self, user: &UserId, categories: CategorySet) -> Result<(), StoreError> {
        check_storable(user, &categories)?;

        let count = categories.len();
        self.users.write().await.insert(user.clone(), categories);

        // The in-memory update stays authoritative even if the write fails.
        match self.persist().await {
            Ok(()) => debug!(user_id = %user, categories = count, "Category store persisted"),
            Err(e) => warn!(user_id = %user, error = %e, "Failed to persist category store"),
        }
        Ok(())
    }

    async fn users(&self) -> Result<usize, StoreError> {
        Ok(self.users.read().await.len())
    }
}
