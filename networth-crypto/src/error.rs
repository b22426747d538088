//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors produced by key derivation and the envelope codec.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// AEAD tag verification failed: wrong key, corrupted or tampered data.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// A tagged value that cannot be base64-decoded or is too short to hold
    /// a nonce and an authentication tag.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// The runtime cannot supply the primitives the codec needs (e.g. the OS RNG).
    /// Retrying does not help.
    #[error("crypto primitive unavailable: {0}")]
    Unavailable(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("decrypted value is not a number: {0}")]
    InvalidNumber(String),
}

impl CryptoError {
    /// True for failures that mean "this envelope cannot be opened with this key".
    ///
    /// Malformed envelopes are handled exactly like tag mismatches.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::Decryption(_) | Self::MalformedEnvelope(_))
    }
}
