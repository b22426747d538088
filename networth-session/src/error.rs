//! Session error types.

use networth_crypto::CryptoError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// No password in the session cache. The user has to sign in again;
    /// this never means "treat the data as unencrypted".
    #[error("no session key available (sign in again)")]
    MissingKey,

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
