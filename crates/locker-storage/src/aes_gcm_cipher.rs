use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use locker_core::{
    cipher::{CipherError, CipherProvider, KEY_LEN, NONCE_LEN},
    KeyMaterial,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

/// AES-256-GCM adapter. Nonces and generated keys come from `OsRng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcmCipher;

impl AesGcmCipher {
    pub fn new() -> Self {
        Self
    }

    /// Fresh random 256-bit key, base64-encoded.
    pub fn generate_key() -> Result<KeyMaterial, CipherError> {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        OsRng
            .try_fill_bytes(&mut bytes[..])
            .map_err(|e| CipherError::Random(e.to_string()))?;
        Ok(KeyMaterial::from_bytes(&bytes))
    }
}

impl CipherProvider for AesGcmCipher {
    fn is_available(&self) -> bool {
        true
    }

    fn random_nonce(&self) -> Result<[u8; NONCE_LEN], CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| CipherError::Random(e.to_string()))?;
        Ok(nonce)
    }

    fn seal(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        build_cipher(key)
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|_| CipherError::Seal)
    }

    fn open(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        build_cipher(key)
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::Rejected)
    }
}

fn build_cipher(key: &[u8; KEY_LEN]) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key))
}
