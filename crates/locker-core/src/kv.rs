use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by key-value backends.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Underlying storage failure.
    #[error("storage failure: {reason}")]
    Backend { reason: String },
}

/// Host key-value store. Values are opaque strings (serialized envelopes).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw entry for a key, `None` when it was never written or has been removed.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Persist an entry, overwriting any existing one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove an entry (idempotent).
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral sessions. Clones share the same map,
/// so a test can keep a handle and inspect what a `SecureStore` persisted.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.lock().map_err(|err| StorageError::Backend {
            reason: format!("lock poisoned: {err}"),
        })?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.inner.lock().map_err(|err| StorageError::Backend {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.inner.lock().map_err(|err| StorageError::Backend {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_overwrites_and_clones_share_state() {
        let store = InMemoryKeyValueStore::new();
        let handle = store.clone();

        store.set("k", "first").await.expect("set should succeed");
        store.set("k", "second").await.expect("set should succeed");

        let value = handle.get("k").await.expect("get should succeed");
        assert_eq!(value.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", "v").await.expect("set should succeed");
        store.remove("k").await.expect("remove should succeed");
        store
            .remove("k")
            .await
            .expect("remove again should still succeed");

        assert_eq!(store.get("k").await.expect("get"), None);
    }
}
