use thiserror::Error;

/// Raw key length for AES-256.
pub const KEY_LEN: usize = 32;
/// GCM nonce length.
pub const NONCE_LEN: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("authenticated cipher is not available")]
    Unavailable,
    #[error("random source failed: {0}")]
    Random(String),
    #[error("encryption failed")]
    Seal,
    /// Integrity check failed; the input must be treated as untrusted.
    #[error("decryption rejected")]
    Rejected,
}

/// Capability-gated AEAD primitive (AES-256-GCM or equivalent).
///
/// `is_available` is consulted on every `SecureStore` operation, not once at
/// construction, so a host may gain or lose the primitive at runtime.
pub trait CipherProvider: Send + Sync {
    /// Whether the authenticated primitive can be used right now.
    fn is_available(&self) -> bool;

    /// Fresh nonce from a cryptographically secure source.
    fn random_nonce(&self) -> Result<[u8; NONCE_LEN], CipherError>;

    /// Encrypt `plaintext`, returning ciphertext with the authentication tag appended.
    fn seal(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CipherError>;

    /// Verify and decrypt. Must return `CipherError::Rejected` instead of
    /// unauthenticated bytes.
    fn open(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError>;
}

/// Adapter for hosts without an authenticated primitive. A `SecureStore` using
/// it always takes the reversible-encoding path, which protects nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCipher;

impl CipherProvider for UnavailableCipher {
    fn is_available(&self) -> bool {
        false
    }

    fn random_nonce(&self) -> Result<[u8; NONCE_LEN], CipherError> {
        Err(CipherError::Unavailable)
    }

    fn seal(
        &self,
        _key: &[u8; KEY_LEN],
        _nonce: &[u8; NONCE_LEN],
        _plaintext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        Err(CipherError::Unavailable)
    }

    fn open(
        &self,
        _key: &[u8; KEY_LEN],
        _nonce: &[u8; NONCE_LEN],
        _ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        Err(CipherError::Unavailable)
    }
}
