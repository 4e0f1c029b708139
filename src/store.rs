//! Durable key/value storage for the note controller.
//!
//! Modelled on browser local storage: string keys, string values, whole-value
//! overwrite. The server uses a sled tree; tests use [`MemoryStorage`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::error::Result;

/// Name of the sled tree holding local-storage entries.
const LOCAL_STORAGE_TREE: &str = "local_storage";

pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

// ============================================================================
// Sled Storage
// ============================================================================

pub struct SledStorage {
    tree: sled::Tree,
}

impl SledStorage {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree(LOCAL_STORAGE_TREE)?,
        })
    }
}

impl KeyValueStorage for SledStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self.tree.get(key.as_bytes())?;
        Ok(value.map(|v| String::from_utf8_lossy(&v).into_owned()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

// ============================================================================
// In-Memory Storage
// ============================================================================

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
