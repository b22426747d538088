//! The `ENC:` text envelope.
//!
//! Wire format: the ASCII literal `ENC:` followed by standard (padded, `+/`)
//! base64 of `nonce(12) || ciphertext || tag(16)`. The tag lets callers tell
//! encrypted values from legacy plaintext without attempting decryption.
//! Untagged input is returned unchanged by the `decrypt_*` functions.

use crate::cipher::{self, EncryptedData};
use crate::error::{CryptoError, CryptoResult};
use crate::key::DerivedKey;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal prefix of every envelope.
pub const ENVELOPE_TAG: &str = "ENC:";

/// Returns true if `value` carries the envelope tag. No decryption is attempted.
pub fn is_encrypted(value: &str) -> bool {
    value.starts_with(ENVELOPE_TAG)
}

/// A tagged, base64-encoded AES-GCM payload, stored as a single string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Envelope(String);

impl Envelope {
    /// Wraps `value` if it carries the envelope tag.
    ///
    /// Only the tag is checked here; base64 and length are validated on open.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        Self::classify(value.into()).ok()
    }

    /// Splits a column value into an envelope, or hands the untagged value back.
    pub fn classify(value: String) -> Result<Self, String> {
        if is_encrypted(&value) {
            Ok(Self(value))
        } else {
            Err(value)
        }
    }

    /// Encrypts `plaintext` under `key` with a fresh nonce.
    pub fn seal(key: &DerivedKey, plaintext: &[u8]) -> CryptoResult<Self> {
        let data = cipher::encrypt(key, plaintext)?;
        let mut out = String::with_capacity(ENVELOPE_TAG.len() + (data.len() * 4).div_ceil(3) + 3);
        out.push_str(ENVELOPE_TAG);
        STANDARD.encode_string(data.to_bytes(), &mut out);
        Ok(Self(out))
    }

    /// Decodes the payload without decrypting it.
    pub fn decode(&self) -> CryptoResult<EncryptedData> {
        let body = &self.0[ENVELOPE_TAG.len()..];
        let bytes = STANDARD
            .decode(body)
            .map_err(|e| CryptoError::MalformedEnvelope(format!("base64: {e}")))?;
        EncryptedData::from_bytes(&bytes)
    }

    /// Decrypts the envelope into raw bytes.
    pub fn open(&self, key: &DerivedKey) -> CryptoResult<Vec<u8>> {
        cipher::decrypt(key, &self.decode()?)
    }

    /// Decrypts the envelope into a UTF-8 string.
    pub fn open_string(&self, key: &DerivedKey) -> CryptoResult<String> {
        let bytes = self.open(key)?;
        String::from_utf8(bytes)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Envelope> for String {
    fn from(envelope: Envelope) -> Self {
        envelope.0
    }
}

impl TryFrom<String> for Envelope {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
            .ok_or_else(|| CryptoError::MalformedEnvelope("missing ENC: tag".to_string()))
    }
}

/// Encrypts a string value into an envelope.
pub fn encrypt_string(key: &DerivedKey, plaintext: &str) -> CryptoResult<Envelope> {
    Envelope::seal(key, plaintext.as_bytes())
}

/// Decrypts a tagged value, or returns an untagged value unchanged.
///
/// Pass-through exists for rows written before encryption was introduced;
/// it is a compatibility policy, not a security boundary.
pub fn decrypt_string(key: &DerivedKey, value: &str) -> CryptoResult<String> {
    match Envelope::parse(value) {
        Some(envelope) => envelope.open_string(key),
        None => Ok(value.to_string()),
    }
}

/// Encrypts a number via its shortest round-tripping decimal form.
pub fn encrypt_number(key: &DerivedKey, value: f64) -> CryptoResult<Envelope> {
    encrypt_string(key, &value.to_string())
}

/// Decrypts (or passes through) a value and parses it as a number.
pub fn decrypt_number(key: &DerivedKey, value: &str) -> CryptoResult<f64> {
    let text = decrypt_string(key, value)?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| CryptoError::InvalidNumber(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> DerivedKey {
        DerivedKey::from_bytes([9u8; crate::KEY_SIZE])
    }

    #[test]
    fn parse_requires_tag() {
        assert!(Envelope::parse("ENC:abc").is_some());
        assert!(Envelope::parse("enc:abc").is_none());
        assert!(Envelope::parse(" ENC:abc").is_none());
        assert!(Envelope::parse("").is_none());
    }

    #[test]
    fn bad_base64_is_malformed() {
        let env = Envelope::parse("ENC:***not base64***").unwrap();
        assert!(matches!(env.open(&key()), Err(CryptoError::MalformedEnvelope(_))));
    }

    #[test]
    fn url_safe_alphabet_is_rejected() {
        // '-' and '_' only exist in the URL-safe alphabet.
        let env = Envelope::parse("ENC:AAAA-_AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap();
        assert!(matches!(env.decode(), Err(CryptoError::MalformedEnvelope(_))));
    }

    #[test]
    fn serde_rejects_untagged_strings() {
        let err = serde_json::from_str::<Envelope>("\"plain\"").unwrap_err();
        assert!(err.to_string().contains("missing ENC: tag"));
    }

    #[test]
    fn number_wrappers_round_trip() {
        let env = encrypt_number(&key(), 1500.5).unwrap();
        assert_eq!(decrypt_number(&key(), env.as_str()).unwrap(), 1500.5);
        assert_eq!(decrypt_number(&key(), "-42.25").unwrap(), -42.25);
    }

    #[test]
    fn decrypt_number_rejects_text() {
        assert!(matches!(
            decrypt_number(&key(), "Chequing"),
            Err(CryptoError::InvalidNumber(_))
        ));
    }
}
