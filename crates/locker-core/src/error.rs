use thiserror::Error;

use crate::kv::StorageError;

/// Errors produced by `SecureStore` operations. None are retried internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LockerError {
    /// Key material is missing or cannot be imported as a 256-bit key.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },
    /// The authenticated cipher rejected the ciphertext, nonce or key.
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },
    /// Stored entry is not an envelope, or a value failed to (de)serialize.
    #[error("data format error: {reason}")]
    DataFormat { reason: String },
    /// Fallback text decoding failed.
    #[error("fallback decode failed: {reason}")]
    FallbackDecode { reason: String },
    /// Cipher primitive failed for a reason other than authentication.
    #[error("cipher failure: {reason}")]
    Cipher { reason: String },
    /// Key-value backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub(crate) fn configuration<E: ToString>(reason: E) -> LockerError {
    LockerError::Configuration {
        reason: reason.to_string(),
    }
}

pub(crate) fn authentication<E: ToString>(reason: E) -> LockerError {
    LockerError::Authentication {
        reason: reason.to_string(),
    }
}

pub(crate) fn data_format<E: ToString>(reason: E) -> LockerError {
    LockerError::DataFormat {
        reason: reason.to_string(),
    }
}

pub(crate) fn fallback_decode<E: ToString>(reason: E) -> LockerError {
    LockerError::FallbackDecode {
        reason: reason.to_string(),
    }
}
