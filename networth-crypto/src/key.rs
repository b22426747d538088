//! Password-based key derivation.
//!
//! Keys are derived with PBKDF2-HMAC-SHA256. The salt is a fixed prefix
//! followed by the user's stable identifier, so the same (password, user)
//! pair always yields the same key and no salt has to be stored anywhere.

use crate::error::{CryptoError, CryptoResult};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a derived key in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Default salt prefix prepended to the user id.
pub const DEFAULT_SALT_PREFIX: &str = "networth-tracker-salt-";

/// Key derivation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// PBKDF2 iteration count.
    pub iterations: u32,
    /// Fixed prefix of every salt.
    pub salt_prefix: String,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            salt_prefix: DEFAULT_SALT_PREFIX.to_string(),
        }
    }
}

impl KdfParams {
    /// Cheap parameters for tests. Never use these for real data.
    pub fn fast_insecure() -> Self {
        Self {
            iterations: 1_000,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> CryptoResult<()> {
        if self.iterations == 0 {
            return Err(CryptoError::KeyDerivation(
                "iteration count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-user salt: `salt_prefix || user_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    pub fn for_user(params: &KdfParams, user_id: &str) -> Self {
        let mut bytes = Vec::with_capacity(params.salt_prefix.len() + user_id.len());
        bytes.extend_from_slice(params.salt_prefix.as_bytes());
        bytes.extend_from_slice(user_id.as_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A 256-bit symmetric key. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a key from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derives the key for `(password, user_id)` with explicit parameters.
///
/// Deterministic and side-effect free. An empty password is rejected; any
/// other length policy belongs to the sign-up form.
pub fn derive_key_with_params(
    password: &str,
    user_id: &str,
    params: &KdfParams,
) -> CryptoResult<DerivedKey> {
    params.validate()?;
    if password.is_empty() {
        return Err(CryptoError::KeyDerivation(
            "password must not be empty".to_string(),
        ));
    }

    let salt = Salt::for_user(params, user_id);
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), params.iterations, &mut key);

    let derived = DerivedKey::from_bytes(key);
    key.zeroize();
    Ok(derived)
}

/// Derives the key for `(password, user_id)` with the default parameters.
pub fn derive_key(password: &str, user_id: &str) -> CryptoResult<DerivedKey> {
    derive_key_with_params(password, user_id, &KdfParams::default())
}
