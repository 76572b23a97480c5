//! Concrete adapters for locker: AES-256-GCM encryption backed by the OS
//! random source, and a file-per-key store with atomic writes.

use std::path::PathBuf;

use locker_core::{LockerError, SecureStore};

pub mod aes_gcm_cipher;
pub mod file_store;

pub use aes_gcm_cipher::AesGcmCipher;
pub use file_store::FileKeyValueStore;

/// Production combination: AES-GCM sealed entries stored as files under `root`.
pub fn init(
    key_material: impl Into<String>,
    root: impl Into<PathBuf>,
) -> Result<SecureStore<FileKeyValueStore, AesGcmCipher>, LockerError> {
    SecureStore::init(key_material, FileKeyValueStore::new(root), AesGcmCipher::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_rejects_missing_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = init("", dir.path()).err().expect("should fail");
        assert!(matches!(err, LockerError::Configuration { .. }));
        assert_eq!(
            std::fs::read_dir(dir.path()).expect("read dir").count(),
            0,
            "no files may be created"
        );
    }

    #[tokio::test]
    async fn init_builds_authenticated_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key = AesGcmCipher::generate_key().expect("keygen");
        let store = init(key.as_base64(), dir.path()).expect("init");

        let strategy = store.save("prefs", &vec!["dark", "compact"]).await.expect("save");
        assert!(strategy.is_authenticated());

        let loaded: Option<Vec<String>> = store.load("prefs").await.expect("load");
        assert_eq!(loaded, Some(vec!["dark".to_string(), "compact".to_string()]));
    }
}
