//! Shared fixtures for ledger tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use networth_crypto::KdfParams;
use networth_records::{Account, AccountKind, AccountRow, Transaction, TransactionRow};
use networth_session::{SessionContext, SessionKeyCache, MemorySessionStore};
use networth_storage::{LedgerStore, ProtectedLedger};
use std::sync::Arc;

pub const USER: &str = "user-42";
pub const PASSWORD: &str = "CorrectHorse8!";

pub fn fast_cache() -> Arc<SessionKeyCache> {
    Arc::new(SessionKeyCache::with_params(
        Arc::new(MemorySessionStore::new()),
        KdfParams::fast_insecure(),
    ))
}

/// A signed-in ledger over a fresh in-memory store.
pub fn signed_in_ledger() -> ProtectedLedger {
    let store = LedgerStore::open_in_memory().expect("open in-memory ledger");
    ProtectedLedger::new(store, SessionContext::sign_in(USER, PASSWORD, fast_cache()))
}

pub fn account(name: &str, balance: f64) -> Account {
    Account {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: USER.into(),
        kind: AccountKind::Depository,
        name: name.into(),
        balance,
        notes: None,
        account_number: None,
        is_hidden: false,
        created_at: 1_700_000_000_000,
        is_placeholder: false,
    }
}

pub fn transaction(account_id: &str, description: &str, amount: f64, day: u32) -> Transaction {
    Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: USER.into(),
        account_id: account_id.into(),
        date: NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date"),
        description: description.into(),
        amount,
        merchant: Some("Loblaws".into()),
        category_name: Some("Groceries".into()),
        notes: None,
        is_pending: false,
        created_at: 1_700_000_000_000,
        is_placeholder: false,
    }
}

/// An account row as written before encryption existed.
pub fn legacy_account_row(id: &str, name: &str, balance: f64) -> AccountRow {
    AccountRow {
        id: id.into(),
        user_id: USER.into(),
        kind: AccountKind::Investment,
        name: name.into(),
        balance,
        notes: Some("legacy notes".into()),
        account_number: Some("000-1234".into()),
        is_hidden: false,
        created_at: 1_600_000_000_000,
    }
}

pub fn legacy_transaction_row(id: &str, account_id: &str, description: &str, amount: f64) -> TransactionRow {
    TransactionRow {
        id: id.into(),
        user_id: USER.into(),
        account_id: account_id.into(),
        date: NaiveDate::from_ymd_opt(2023, 11, 2).expect("valid date"),
        description: description.into(),
        amount,
        merchant: Some("Shell".into()),
        category_name: Some("Gas".into()),
        notes: None,
        is_pending: true,
        created_at: 1_600_000_000_000,
    }
}
