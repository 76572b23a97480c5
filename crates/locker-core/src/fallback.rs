//! Reversible encoding used when no authenticated cipher is available.
//!
//! This is base64 of the UTF-8 text. It provides no confidentiality and no
//! integrity: anyone reading the stored entry can recover or alter the value.
//! Decoding also accepts Latin-1 payloads, the form written by browser `btoa`.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{fallback_decode, LockerError};

pub fn encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

pub fn decode(encoded: &str) -> Result<String, LockerError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| fallback_decode(format!("invalid base64: {e}")))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        // Not UTF-8: every byte is a Latin-1 code point.
        Err(err) => Ok(err.into_bytes().into_iter().map(char::from).collect()),
    }
}
