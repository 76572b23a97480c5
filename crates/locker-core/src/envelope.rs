use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{data_format, LockerError};

/// Which path protects an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// AES-256-GCM under the store key with a random 12-byte nonce.
    Authenticated,
    /// Reversible base64 encoding. No confidentiality, no integrity.
    Encoded,
}

impl Strategy {
    pub fn is_authenticated(self) -> bool {
        matches!(self, Strategy::Authenticated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Authenticated => "authenticated",
            Strategy::Encoded => "encoded",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted form of a value: `{"ciphertext": "...", "nonce": "..."}`.
///
/// Entries written with the older `iv` field name are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64 ciphertext (tag appended), or base64 plaintext for `Encoded`.
    pub ciphertext: String,
    /// Base64 nonce; empty for `Encoded` envelopes.
    #[serde(alias = "iv")]
    pub nonce: String,
}

impl Envelope {
    pub fn strategy(&self) -> Strategy {
        if self.nonce.is_empty() {
            Strategy::Encoded
        } else {
            Strategy::Authenticated
        }
    }

    pub fn to_json(&self) -> Result<String, LockerError> {
        serde_json::to_string(self).map_err(data_format)
    }

    pub fn from_json(raw: &str) -> Result<Self, LockerError> {
        serde_json::from_str(raw).map_err(|e| data_format(format!("malformed envelope: {e}")))
    }
}
