use std::path::PathBuf;

use color_eyre::Result;
use dirs::data_dir;
use locker_core::SecureStore;
use locker_storage::{AesGcmCipher, FileKeyValueStore};
use tracing::debug;

use crate::config::{Config, KEY_ENV};

pub type FileSecureStore = SecureStore<FileKeyValueStore, AesGcmCipher>;

/// Resolve the default data directory for locker.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("locker"))
}

/// Build the encrypted store from config (data dir override, key or `LOCKER_KEY`).
pub fn store_from_config(config: &Config) -> Result<FileSecureStore> {
    let key = config.resolve_key().ok_or_else(|| {
        color_eyre::eyre::eyre!(
            "no encryption key configured; set `key` in the config file or {KEY_ENV} \
             (run `locker config init` or `locker keygen`)"
        )
    })?;

    let root = match &config.data_dir {
        Some(root) => root.clone(),
        None => default_data_dir()?,
    };
    debug!(?root, "initializing encrypted store");
    Ok(locker_storage::init(key, root)?)
}

/// Helper for tests to construct a store rooted at a temp dir with a fresh key.
#[cfg(test)]
pub fn test_store(root: impl Into<PathBuf>) -> FileSecureStore {
    let key = AesGcmCipher::generate_key().expect("keygen");
    SecureStore::with_key(key, FileKeyValueStore::new(root), AesGcmCipher::new())
}
