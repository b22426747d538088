//! Password-and-user-id entry points for the application layer.
//!
//! Each call derives the key afresh from `(password, user_id)`; callers
//! holding a [`DerivedKey`] (e.g. from the session cache) should use the
//! key-based functions at the crate root instead.

use crate::error::{RecordError, RecordResult};
use crate::models::{Account, AccountRow, Transaction, TransactionRow};
use crate::transform;
use networth_crypto::{derive_key, CryptoError, DerivedKey, Envelope};

fn key(password: &str, user_id: &str) -> RecordResult<DerivedKey> {
    Ok(derive_key(password, user_id)?)
}

pub fn encrypt_value(plaintext: &str, password: &str, user_id: &str) -> RecordResult<Envelope> {
    Ok(networth_crypto::encrypt_string(&key(password, user_id)?, plaintext)?)
}

/// Untagged input is returned unchanged.
pub fn decrypt_value(value: &str, password: &str, user_id: &str) -> RecordResult<String> {
    if !is_encrypted(value) {
        return Ok(value.to_string());
    }
    Ok(networth_crypto::decrypt_string(&key(password, user_id)?, value)?)
}

pub fn encrypt_account(account: &Account, password: &str, user_id: &str) -> RecordResult<AccountRow> {
    transform::encrypt_account(account, &key(password, user_id)?)
}

pub fn decrypt_account(row: &AccountRow, password: &str, user_id: &str) -> RecordResult<Account> {
    transform::decrypt_account(row, &key(password, user_id)?)
}

pub fn encrypt_transaction(
    tx: &Transaction,
    password: &str,
    user_id: &str,
) -> RecordResult<TransactionRow> {
    transform::encrypt_transaction(tx, &key(password, user_id)?)
}

pub fn decrypt_transaction(
    row: &TransactionRow,
    password: &str,
    user_id: &str,
) -> RecordResult<Transaction> {
    transform::decrypt_transaction(row, &key(password, user_id)?)
}

/// Cheap tag check; no decryption is attempted.
pub fn is_encrypted(value: &str) -> bool {
    networth_crypto::is_encrypted(value)
}

/// Checks `password` against a value known to be sealed under the user's key.
///
/// A tag mismatch is reported as-is so the UI can say "check your password".
/// An untagged sample proves nothing and is rejected.
pub fn verify_password(sealed_sample: &str, password: &str, user_id: &str) -> RecordResult<()> {
    let envelope = Envelope::parse(sealed_sample).ok_or_else(|| {
        RecordError::Crypto(CryptoError::MalformedEnvelope(
            "verification sample is not encrypted".to_string(),
        ))
    })?;
    envelope.open(&key(password, user_id)?)?;
    Ok(())
}
