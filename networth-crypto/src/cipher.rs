//! AES-256-GCM over raw bytes.
//!
//! Every call draws a fresh 96-bit nonce from the operating system RNG.
//! The ciphertext carries the 16-byte GCM tag at its end.

use crate::error::{CryptoError, CryptoResult};
use crate::key::DerivedKey;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Nonce size for AES-GCM (96 bits).
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag size (128 bits).
pub const TAG_SIZE: usize = 16;

/// Nonce plus ciphertext-with-tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedData {
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext followed by the authentication tag.
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Serializes as `nonce || ciphertext || tag`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Splits `nonce || ciphertext || tag`, rejecting input too short to hold
    /// a nonce and a tag.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::MalformedEnvelope(format!(
                "{} bytes is shorter than nonce + tag ({})",
                bytes.len(),
                NONCE_SIZE + TAG_SIZE
            )));
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
        let mut nonce_arr = [0u8; NONCE_SIZE];
        nonce_arr.copy_from_slice(nonce);
        Ok(Self {
            nonce: nonce_arr,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Total serialized length.
    pub fn len(&self) -> usize {
        NONCE_SIZE + self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cipher_for(key: &DerivedKey) -> CryptoResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CryptoError::InvalidKeyLength {
        expected: crate::KEY_SIZE,
        actual: key.as_bytes().len(),
    })
}

/// Generates a random nonce from the OS RNG.
pub(crate) fn random_nonce() -> CryptoResult<[u8; NONCE_SIZE]> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::Unavailable(format!("os rng: {e}")))?;
    Ok(nonce)
}

/// Encrypts `plaintext` under `key` with a fresh nonce.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    let cipher = cipher_for(key)?;
    let nonce = random_nonce()?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(format!("aes-gcm seal failed: {e}")))?;

    Ok(EncryptedData { nonce, ciphertext })
}

/// Decrypts and authenticates `data`. Never returns partial plaintext.
pub fn decrypt(key: &DerivedKey, data: &EncryptedData) -> CryptoResult<Vec<u8>> {
    if data.ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::MalformedEnvelope(format!(
            "ciphertext of {} bytes cannot hold a {TAG_SIZE}-byte tag",
            data.ciphertext.len()
        )));
    }
    let cipher = cipher_for(key)?;

    cipher
        .decrypt(Nonce::from_slice(&data.nonce), data.ciphertext.as_ref())
        .map_err(|_| {
            CryptoError::Decryption("authentication failed (wrong key or tampered data)".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> DerivedKey {
        DerivedKey::from_bytes([0x42; crate::KEY_SIZE])
    }

    #[test]
    fn ciphertext_is_plaintext_plus_tag() {
        let enc = encrypt(&key(), b"hello").unwrap();
        assert_eq!(enc.ciphertext.len(), 5 + TAG_SIZE);
        assert_eq!(enc.len(), NONCE_SIZE + 5 + TAG_SIZE);
    }

    #[test]
    fn bytes_layout_is_nonce_first() {
        let enc = encrypt(&key(), b"layout").unwrap();
        let bytes = enc.to_bytes();
        assert_eq!(&bytes[..NONCE_SIZE], &enc.nonce);
        assert_eq!(EncryptedData::from_bytes(&bytes).unwrap(), enc);
    }

    #[test]
    fn from_bytes_rejects_short_input() {
        let err = EncryptedData::from_bytes(&[0u8; NONCE_SIZE + TAG_SIZE - 1]).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedEnvelope(_)));
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let enc = encrypt(&key(), b"").unwrap();
        assert_eq!(decrypt(&key(), &enc).unwrap(), b"");
    }

    #[test]
    fn truncated_ciphertext_is_malformed() {
        let mut enc = encrypt(&key(), b"x").unwrap();
        enc.ciphertext.truncate(3);
        assert!(matches!(
            decrypt(&key(), &enc),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }
}
