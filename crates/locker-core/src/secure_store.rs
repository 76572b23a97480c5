use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    cipher::{CipherError, CipherProvider, NONCE_LEN},
    envelope::{Envelope, Strategy},
    error::{authentication, data_format, LockerError},
    fallback,
    key::KeyMaterial,
    kv::KeyValueStore,
};

/// Encrypting façade over a key-value store.
///
/// Values are serialized to JSON, encrypted into an [`Envelope`] and persisted
/// as the envelope's JSON. The cipher capability is checked on every
/// operation: with the primitive present entries are AES-256-GCM sealed,
/// without it they fall back to plain base64 and the returned [`Strategy`]
/// says so.
///
/// Same-key operations are not serialized internally.
pub struct SecureStore<S: KeyValueStore, C: CipherProvider> {
    key: KeyMaterial,
    store: S,
    cipher: C,
}

impl<S: KeyValueStore, C: CipherProvider> SecureStore<S, C> {
    /// Fails with `LockerError::Configuration` on empty key material. Performs no I/O.
    pub fn new(key_material: impl Into<String>, store: S, cipher: C) -> Result<Self, LockerError> {
        let key = KeyMaterial::new(key_material)?;
        Ok(Self::with_key(key, store, cipher))
    }

    /// Alias of [`SecureStore::new`].
    pub fn init(key_material: impl Into<String>, store: S, cipher: C) -> Result<Self, LockerError> {
        Self::new(key_material, store, cipher)
    }

    pub fn with_key(key: KeyMaterial, store: S, cipher: C) -> Self {
        Self { key, store, cipher }
    }

    /// Underlying key-value backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the authenticated cipher is usable right now.
    pub fn capability_check(&self) -> bool {
        self.cipher.is_available()
    }

    /// Strategy the next operation would use.
    pub fn strategy(&self) -> Strategy {
        if self.capability_check() {
            Strategy::Authenticated
        } else {
            Strategy::Encoded
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<Envelope, LockerError> {
        self.encrypt_with(self.strategy(), plaintext)
    }

    /// Decrypt with the strategy of the current runtime, not of the envelope;
    /// an encoded envelope presented to an authenticated reader is rejected.
    pub fn decrypt(&self, ciphertext: &str, nonce: &str) -> Result<String, LockerError> {
        match self.strategy() {
            Strategy::Authenticated => self.open(ciphertext, nonce),
            Strategy::Encoded => {
                warn!("authenticated cipher unavailable; reading unprotected entry");
                fallback::decode(ciphertext)
            }
        }
    }

    /// Serialize, encrypt and persist `value` under `key`, overwriting any
    /// existing entry. Returns the strategy that protected it.
    #[instrument(skip_all, fields(key))]
    pub async fn save<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<Strategy, LockerError> {
        let text = serde_json::to_string(value)
            .map_err(|e| data_format(format!("value is not serializable: {e}")))?;

        let strategy = self.strategy();
        let envelope = self.encrypt_with(strategy, &text)?;
        self.store.set(key, &envelope.to_json()?).await?;

        debug!(%strategy, "entry saved");
        Ok(strategy)
    }

    /// Fetch and decrypt the value under `key`; `None` when there is no entry.
    #[instrument(skip_all, fields(key))]
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, LockerError> {
        let raw = match self.store.get(key).await? {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                debug!("no entry");
                return Ok(None);
            }
        };

        let envelope = Envelope::from_json(&raw)?;
        let text = self.decrypt(&envelope.ciphertext, &envelope.nonce)?;
        let value = serde_json::from_str(&text)
            .map_err(|e| data_format(format!("decrypted value does not match type: {e}")))?;
        Ok(Some(value))
    }

    /// Delete the entry under `key`; absent keys are not an error.
    #[instrument(skip_all, fields(key))]
    pub async fn remove(&self, key: &str) -> Result<(), LockerError> {
        self.store.remove(key).await?;
        Ok(())
    }

    fn encrypt_with(&self, strategy: Strategy, plaintext: &str) -> Result<Envelope, LockerError> {
        match strategy {
            Strategy::Authenticated => self.seal(plaintext),
            Strategy::Encoded => {
                warn!("authenticated cipher unavailable; entry is encoded, not encrypted");
                Ok(Envelope {
                    ciphertext: fallback::encode(plaintext),
                    nonce: String::new(),
                })
            }
        }
    }

    fn seal(&self, plaintext: &str) -> Result<Envelope, LockerError> {
        let nonce = self.cipher.random_nonce().map_err(cipher_err)?;
        let key = self.key.import()?;
        let ciphertext = self
            .cipher
            .seal(&key, &nonce, plaintext.as_bytes())
            .map_err(cipher_err)?;

        Ok(Envelope {
            ciphertext: STANDARD.encode(ciphertext),
            nonce: STANDARD.encode(nonce),
        })
    }

    fn open(&self, ciphertext: &str, nonce: &str) -> Result<String, LockerError> {
        let key = self.key.import()?;
        let nonce = decode_nonce(nonce)?;
        let ciphertext = STANDARD
            .decode(ciphertext)
            .map_err(|e| authentication(format!("ciphertext is not valid base64: {e}")))?;

        let cleartext = self
            .cipher
            .open(&key, &nonce, &ciphertext)
            .map_err(|err| match err {
                CipherError::Rejected => {
                    authentication("ciphertext, nonce or key did not verify")
                }
                other => cipher_err(other),
            })?;

        String::from_utf8(cleartext)
            .map_err(|e| data_format(format!("decrypted text is not UTF-8: {e}")))
    }
}

fn decode_nonce(encoded: &str) -> Result<[u8; NONCE_LEN], LockerError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| authentication(format!("nonce is not valid base64: {e}")))?;

    bytes.try_into().map_err(|bytes: Vec<u8>| {
        authentication(format!(
            "expected {NONCE_LEN}-byte nonce, got {}",
            bytes.len()
        ))
    })
}

fn cipher_err(err: CipherError) -> LockerError {
    LockerError::Cipher {
        reason: err.to_string(),
    }
}
