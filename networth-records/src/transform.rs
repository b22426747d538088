//! Mapping between plaintext models and their persisted rows.
//!
//! Writes always produce protected rows. Reads accept protected and legacy
//! rows, deciding per record from the tag on the designated column.
//!
//! Two failure policies:
//! - `decrypt_*` returns the error; used for explicit single-record actions.
//! - `decrypt_*_or_placeholder` (and the batch functions) never fail: an
//!   unreadable record becomes a marked placeholder so one bad row cannot
//!   block the rest of the view.

use crate::error::{RecordError, RecordResult};
use crate::models::{Account, AccountRow, Transaction, TransactionRow};
use crate::protected::Protected;
use crate::secrets::{AccountSecrets, SecretBundle, TransactionSecrets};
use networth_crypto::{encrypt_string, DerivedKey};
use tracing::warn;

/// Display text substituted for fields that could not be decrypted.
pub const PLACEHOLDER_TEXT: &str = "[Encrypted]";

/// Value written to numeric columns of protected rows.
pub const SENTINEL_AMOUNT: f64 = 0.0;

// ── Accounts ─────────────────────────────────────────────────────

pub fn encrypt_account(account: &Account, key: &DerivedKey) -> RecordResult<AccountRow> {
    let secrets = AccountSecrets::new(account.name.clone(), account.balance, account.notes.clone());
    let sealed = secrets.seal(key)?;

    let account_number = account
        .account_number
        .as_deref()
        .map(|n| encrypt_string(key, n).map(String::from))
        .transpose()?;

    Ok(AccountRow {
        id: account.id.clone(),
        user_id: account.user_id.clone(),
        kind: account.kind,
        name: sealed.into_string(),
        balance: SENTINEL_AMOUNT,
        notes: None,
        account_number,
        is_hidden: account.is_hidden,
        created_at: account.created_at,
    })
}

fn account_secrets(row: &AccountRow) -> Protected<AccountSecrets> {
    Protected::from_column(row.name.clone(), |name| {
        AccountSecrets::new(name, row.balance, row.notes.clone())
    })
}

pub fn decrypt_account(row: &AccountRow, key: &DerivedKey) -> RecordResult<Account> {
    let secrets = account_secrets(row).resolve(key)?;
    let account_number = row
        .account_number
        .clone()
        .map(|n| Protected::field(n).resolve_string(key))
        .transpose()?;

    Ok(Account {
        id: row.id.clone(),
        user_id: row.user_id.clone(),
        kind: row.kind,
        name: secrets.name,
        balance: secrets.balance,
        notes: secrets.notes,
        account_number,
        is_hidden: row.is_hidden,
        created_at: row.created_at,
        is_placeholder: false,
    })
}

/// Cleartext columns of `row` with placeholder sensitive fields.
pub fn placeholder_account(row: &AccountRow) -> Account {
    Account {
        id: row.id.clone(),
        user_id: row.user_id.clone(),
        kind: row.kind,
        name: PLACEHOLDER_TEXT.to_string(),
        balance: SENTINEL_AMOUNT,
        notes: None,
        account_number: None,
        is_hidden: row.is_hidden,
        created_at: row.created_at,
        is_placeholder: true,
    }
}

pub fn decrypt_account_or_placeholder(row: &AccountRow, key: &DerivedKey) -> Account {
    decrypt_account(row, key).unwrap_or_else(|e| {
        log_unreadable("account", &row.id, &e);
        placeholder_account(row)
    })
}

/// Decrypt-modify-reencrypt of the whole bundle to change the notes.
///
/// Legacy rows come back protected.
pub fn update_account_notes(
    row: &AccountRow,
    key: &DerivedKey,
    notes: Option<String>,
) -> RecordResult<AccountRow> {
    let mut account = decrypt_account(row, key)?;
    account.notes = notes;
    encrypt_account(&account, key)
}

// ── Transactions ─────────────────────────────────────────────────

pub fn encrypt_transaction(tx: &Transaction, key: &DerivedKey) -> RecordResult<TransactionRow> {
    let secrets = TransactionSecrets::new(
        tx.description.clone(),
        tx.amount,
        tx.merchant.clone(),
        tx.category_name.clone(),
        tx.notes.clone(),
    );
    let sealed = secrets.seal(key)?;

    Ok(TransactionRow {
        id: tx.id.clone(),
        user_id: tx.user_id.clone(),
        account_id: tx.account_id.clone(),
        date: tx.date,
        description: sealed.into_string(),
        amount: SENTINEL_AMOUNT,
        merchant: None,
        category_name: None,
        notes: None,
        is_pending: tx.is_pending,
        created_at: tx.created_at,
    })
}

fn transaction_secrets(row: &TransactionRow) -> Protected<TransactionSecrets> {
    Protected::from_column(row.description.clone(), |description| {
        TransactionSecrets::new(
            description,
            row.amount,
            row.merchant.clone(),
            row.category_name.clone(),
            row.notes.clone(),
        )
    })
}

pub fn decrypt_transaction(row: &TransactionRow, key: &DerivedKey) -> RecordResult<Transaction> {
    let secrets = transaction_secrets(row).resolve(key)?;

    Ok(Transaction {
        id: row.id.clone(),
        user_id: row.user_id.clone(),
        account_id: row.account_id.clone(),
        date: row.date,
        description: secrets.description,
        amount: secrets.amount,
        merchant: secrets.merchant,
        category_name: secrets.category_name,
        notes: secrets.notes,
        is_pending: row.is_pending,
        created_at: row.created_at,
        is_placeholder: false,
    })
}

pub fn placeholder_transaction(row: &TransactionRow) -> Transaction {
    Transaction {
        id: row.id.clone(),
        user_id: row.user_id.clone(),
        account_id: row.account_id.clone(),
        date: row.date,
        description: PLACEHOLDER_TEXT.to_string(),
        amount: SENTINEL_AMOUNT,
        merchant: None,
        category_name: None,
        notes: None,
        is_pending: row.is_pending,
        created_at: row.created_at,
        is_placeholder: true,
    }
}

pub fn decrypt_transaction_or_placeholder(row: &TransactionRow, key: &DerivedKey) -> Transaction {
    decrypt_transaction(row, key).unwrap_or_else(|e| {
        log_unreadable("transaction", &row.id, &e);
        placeholder_transaction(row)
    })
}

pub fn update_transaction_notes(
    row: &TransactionRow,
    key: &DerivedKey,
    notes: Option<String>,
) -> RecordResult<TransactionRow> {
    let mut tx = decrypt_transaction(row, key)?;
    tx.notes = notes;
    encrypt_transaction(&tx, key)
}

fn log_unreadable(kind: &str, id: &str, err: &RecordError) {
    warn!(
        record = kind,
        id,
        integrity = err.is_integrity_failure(),
        "substituting placeholder for unreadable record: {err}"
    );
}
