use std::fmt;

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
        DecodePaddingMode,
    },
    Engine as _,
};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    cipher::KEY_LEN,
    error::{configuration, LockerError},
};

/// Standard alphabet with optional padding; URL-safe input is mapped onto it first.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Caller-supplied key material: a base64-encoded 256-bit key.
///
/// Only emptiness is checked on construction; decoding happens on every cipher
/// operation via [`KeyMaterial::import`]. The text is wiped on drop and never
/// shown by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    encoded: String,
}

impl KeyMaterial {
    pub fn new(encoded: impl Into<String>) -> Result<Self, LockerError> {
        let encoded = Zeroizing::new(encoded.into());
        if encoded.trim().is_empty() {
            return Err(configuration(
                "encryption key must be provided in initialization",
            ));
        }
        Ok(Self {
            encoded: (*encoded).clone(),
        })
    }

    /// Encode raw key bytes.
    pub fn from_bytes(bytes: &[u8; KEY_LEN]) -> Self {
        Self {
            encoded: STANDARD.encode(bytes),
        }
    }

    /// Base64 form, for handing the key back to its owner (e.g. `keygen`).
    pub fn as_base64(&self) -> &str {
        &self.encoded
    }

    /// Decode into raw 256-bit key bytes. Standard and URL-safe alphabets are
    /// accepted, padded or not.
    pub fn import(&self) -> Result<Zeroizing<[u8; KEY_LEN]>, LockerError> {
        let normalized: Zeroizing<String> = Zeroizing::new(
            self.encoded
                .trim()
                .chars()
                .map(|c| match c {
                    '-' => '+',
                    '_' => '/',
                    c => c,
                })
                .collect(),
        );
        let bytes = Zeroizing::new(
            LENIENT
                .decode(normalized.as_bytes())
                .map_err(|e| configuration(format!("key is not valid base64: {e}")))?,
        );

        if bytes.len() != KEY_LEN {
            return Err(configuration(format!(
                "expected {KEY_LEN} key bytes, got {}",
                bytes.len()
            )));
        }

        let mut out = Zeroizing::new([0u8; KEY_LEN]);
        out.copy_from_slice(&bytes);
        Ok(out)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_blank_material() {
        for input in ["", "   ", "\n"] {
            let err = KeyMaterial::new(input).expect_err("blank key must be rejected");
            assert!(matches!(err, LockerError::Configuration { .. }));
        }
    }

    #[test]
    fn import_round_trips_raw_bytes() {
        let raw = [42u8; KEY_LEN];
        let material = KeyMaterial::from_bytes(&raw);
        let imported = material.import().expect("import");
        assert_eq!(*imported, raw);
    }

    #[test]
    fn import_tolerates_surrounding_whitespace() {
        let encoded = format!("{}\n", STANDARD.encode([1u8; KEY_LEN]));
        let material = KeyMaterial::new(encoded).expect("construct");
        assert!(material.import().is_ok());
    }

    #[test]
    fn import_accepts_url_safe_and_unpadded_keys() {
        let raw = [0xfb; KEY_LEN];
        let standard = STANDARD.encode(raw);
        assert!(standard.contains('+') && standard.contains('/'));

        let url_safe = standard.replace('+', "-").replace('/', "_");
        let unpadded = standard.trim_end_matches('=').to_string();
        let url_safe_unpadded = url_safe.trim_end_matches('=').to_string();

        for encoded in [standard, url_safe, unpadded, url_safe_unpadded] {
            let material = KeyMaterial::new(encoded.clone()).expect("construct");
            let imported = material.import().expect("import");
            assert_eq!(*imported, raw, "{encoded}");
        }
    }

    #[test]
    fn import_rejects_wrong_length_and_bad_base64() {
        let short = KeyMaterial::new("abcd").expect("construct");
        assert!(matches!(
            short.import(),
            Err(LockerError::Configuration { .. })
        ));

        let garbage = KeyMaterial::new("not base64 at all!").expect("construct");
        assert!(matches!(
            garbage.import(),
            Err(LockerError::Configuration { .. })
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let material = KeyMaterial::from_bytes(&[9u8; KEY_LEN]);
        let rendered = format!("{material:?}");
        assert!(!rendered.contains(material.as_base64()));
    }
}
