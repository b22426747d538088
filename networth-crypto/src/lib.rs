//! Client-side encryption layer for the net-worth tracker.
//!
//! Provides:
//! - PBKDF2-HMAC-SHA256 key derivation from the login password, salted with
//!   the user's stable id (no salt storage needed)
//! - AES-256-GCM authenticated encryption with a fresh nonce per call
//! - The `ENC:` text envelope stored in place of sensitive columns
//!
//! # Zero knowledge
//!
//! Keys exist only on the client. The server stores envelopes and can
//! neither read them nor recover them if the password is lost; there is no
//! escrow, rotation or recovery path in this crate.

mod cipher;
pub mod envelope;
mod error;
mod key;

pub use cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use envelope::{
    decrypt_number, decrypt_string, encrypt_number, encrypt_string, is_encrypted, Envelope,
    ENVELOPE_TAG,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    derive_key, derive_key_with_params, DerivedKey, KdfParams, Salt, DEFAULT_ITERATIONS,
    DEFAULT_SALT_PREFIX, KEY_SIZE,
};
