//! Shared fixtures for record transformer tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use networth_crypto::{derive_key_with_params, DerivedKey, KdfParams};
use networth_records::{Account, AccountKind, Transaction};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn fast_key(password: &str, user_id: &str) -> DerivedKey {
    derive_key_with_params(password, user_id, &KdfParams::fast_insecure())
        .expect("key derivation must succeed")
}

pub fn account(name: &str, balance: f64, notes: Option<&str>) -> Account {
    Account {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: "user-42".into(),
        kind: AccountKind::Depository,
        name: name.into(),
        balance,
        notes: notes.map(str::to_string),
        account_number: None,
        is_hidden: false,
        created_at: 1_700_000_000_000,
        is_placeholder: false,
    }
}

pub fn transaction(description: &str, amount: f64) -> Transaction {
    Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: "user-42".into(),
        account_id: "acct-1".into(),
        date: NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date"),
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
