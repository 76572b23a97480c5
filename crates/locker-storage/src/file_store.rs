use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use locker_core::kv::{KeyValueStore, StorageError};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::instrument;

/// File-backed key-value store: one file per key under `root`.
/// Writes go through a temp file and an atomic rename.
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(sanitize_key(key))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    #[instrument(skip_all, fields(key))]
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_err(err)),
        }
    }

    #[instrument(skip_all, fields(key))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(storage_err)?;
        write_entry(&self.path_for(key), value)
    }

    #[instrument(skip_all, fields(key))]
    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_err(err)),
        }
    }
}

fn write_entry(path: &Path, value: &str) -> Result<(), StorageError> {
    let parent = path.parent().ok_or_else(|| StorageError::Backend {
        reason: "invalid storage path".to_string(),
    })?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(storage_err)?;
    tmp.write_all(value.as_bytes()).map_err(storage_err)?;
    tmp.flush().map_err(storage_err)?;
    tmp.persist(path).map_err(|e| storage_err(e.error))?;
    Ok(())
}

// Every key, including "" and keys longer than a file name allows, maps to a
// flat 64-character name.
fn sanitize_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

fn storage_err<E: ToString>(err: E) -> StorageError {
    StorageError::Backend {
        reason: err.to_string(),
    }
}
