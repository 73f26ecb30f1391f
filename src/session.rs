//! Persisted client-side session storage
//!
//! The access token lives under a single well-known key. The shell only talks
//! to the [`SessionStorage`] trait, so tests inject [`MemoryStorage`] and the
//! binary uses [`FileStorage`].

use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::AppResult;

/// Storage key of the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Key/value storage surviving the process (like browser local storage)
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    fn clear(&self, key: &str) -> AppResult<()>;

    fn access_token(&self) -> AppResult<Option<String>> {
        self.get(ACCESS_TOKEN_KEY)
    }

    fn store_access_token(&self, token: &str) -> AppResult<()> {
        self.set(ACCESS_TOKEN_KEY, token)
    }

    fn clear_access_token(&self) -> AppResult<()> {
        self.clear(ACCESS_TOKEN_KEY)
    }
}

/// In-process storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<IndexMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.shift_remove(key);
        Ok(())
    }
}

/// JSON file storage. The whole map is rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<IndexMap<String, String>>,
}

impl FileStorage {
    /// Open the storage file, starting empty when it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read(&path)?;
            serde_json::from_slice(&raw)?
        } else {
            IndexMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Session storage opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self, entries: &IndexMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_vec_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn clear(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.shift_remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
