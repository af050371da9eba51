//! Durable key-value preferences (the theme flag lives here)

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task;

use crate::{Result, ShowcaseError};

/// Persistent string preferences keyed by name
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct StoredPreference {
    value: String,
    updated_at: i64, // Unix timestamp (seconds)
}

/// Preference store backed by an on-disk fjall keyspace
pub struct FjallPreferenceStore {
    _db: fjall::Database,
    store: Keyspace,
}

fn storage_err(err: impl std::fmt::Display) -> ShowcaseError {
    ShowcaseError::storage(err.to_string())
}

impl FjallPreferenceStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(path.as_ref())
            .open()
            .map_err(storage_err)?;
        let store = db
            .keyspace("preferences", fjall::KeyspaceCreateOptions::default)
            .map_err(storage_err)?;
        Ok(Self { _db: db, store })
    }
}

#[async_trait]
impl PreferenceStore for FjallPreferenceStore {
    #[tracing::instrument(name = "query_preference", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || {
            store
                .get(key)
                .map(|value| value.map(|v| v.to_vec()))
                .map_err(storage_err)
        })
        .await
        .map_err(storage_err)??;

        match maybe_bytes {
            Some(bytes) => {
                let entry: StoredPreference = postcard::from_bytes(&bytes).map_err(storage_err)?;
                Ok(Some(entry.value))
            }
            None => {
                tracing::debug!("Preference not set");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(name = "put_preference", level = "debug", skip(self))]
    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let entry = StoredPreference {
            value: value.to_string(),
            updated_at: Utc::now().timestamp(),
        };
        let bytes = postcard::to_stdvec(&entry).map_err(storage_err)?;

        task::spawn_blocking(move || store.insert(key, bytes).map_err(storage_err))
            .await
            .map_err(storage_err)??;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.remove(key).map_err(storage_err))
            .await
            .map_err(storage_err)??;
        Ok(())
    }
}

/// Volatile store, used when no directory is configured and in tests
#[derive(Default)]
pub struct MemoryPreferenceStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get("theme").await.unwrap(), None);

        store.put("theme", "dark").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));

        store.remove("theme").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fjall_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FjallPreferenceStore::open(dir.path()).unwrap();

        store.put("theme", "dark").await.unwrap();
        store.put("theme", "light").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("light"));

        store.remove("theme").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), None);
    }
}
