//! Working-set decryption.
//!
//! Each record is independent (its own nonce, no shared counter), so a batch
//! can fan out freely. Output order always matches input order, and every
//! input row yields exactly one model, decrypted or placeholder.

use crate::models::{Account, AccountRow, Transaction, TransactionRow};
use crate::transform::{
    decrypt_account_or_placeholder, decrypt_transaction_or_placeholder, placeholder_account,
    placeholder_transaction,
};
use networth_crypto::DerivedKey;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub fn decrypt_accounts(rows: &[AccountRow], key: &DerivedKey) -> Vec<Account> {
    debug!("decrypting {} accounts", rows.len());
    rows.iter()
        .map(|row| decrypt_account_or_placeholder(row, key))
        .collect()
}

pub fn decrypt_transactions(rows: &[TransactionRow], key: &DerivedKey) -> Vec<Transaction> {
    debug!("decrypting {} transactions", rows.len());
    rows.iter()
        .map(|row| decrypt_transaction_or_placeholder(row, key))
        .collect()
}

/// Decrypts accounts on the blocking pool, one task per row.
pub async fn decrypt_accounts_concurrent(
    rows: Vec<AccountRow>,
    key: Arc<DerivedKey>,
) -> Vec<Account> {
    fan_out(rows, key, decrypt_account_or_placeholder, placeholder_account).await
}

/// Decrypts transactions on the blocking pool, one task per row.
pub async fn decrypt_transactions_concurrent(
    rows: Vec<TransactionRow>,
    key: Arc<DerivedKey>,
) -> Vec<Transaction> {
    fan_out(
        rows,
        key,
        decrypt_transaction_or_placeholder,
        placeholder_transaction,
    )
    .await
}

async fn fan_out<R, T>(
    rows: Vec<R>,
    key: Arc<DerivedKey>,
    decrypt: fn(&R, &DerivedKey) -> T,
    placeholder: fn(&R) -> T,
) -> Vec<T>
where
    R: Send + Sync + 'static,
    T: Send + 'static,
{
    let total = rows.len();
    debug!("fanning out decryption of {total} records");

    let rows = Arc::new(rows);
    let mut tasks = JoinSet::new();
    for idx in 0..total {
        let rows = rows.clone();
        let key = key.clone();
        tasks.spawn_blocking(move || (idx, decrypt(&rows[idx], &key)));
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, model)) => slots[idx] = Some(model),
            Err(e) => warn!("decryption task failed: {e}"),
        }
    }

    // A task that died leaves its slot empty; it still gets a placeholder.
    slots
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| slot.unwrap_or_else(|| placeholder(&rows[idx])))
        .collect()
}
