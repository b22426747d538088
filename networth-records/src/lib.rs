//! Record transformers for the net-worth tracker.
//!
//! Accounts and transactions are persisted with all their sensitive fields
//! bundled into a single `ENC:` envelope per record, stored in the column
//! that used to hold the display name (accounts) or description
//! (transactions). Numeric columns of protected rows hold a zero sentinel.
//! Identifiers, dates, foreign keys and flags stay in the clear.
//!
//! # Architecture
//!
//! - [`secrets`]: versioned bundles of the sensitive fields
//! - [`Protected`]: legacy-or-sealed value, resolved once per read
//! - [`transform`]: row <-> model mapping with strict and placeholder modes
//! - [`batch`]: order-preserving working-set decryption, sequential or fanned out
//! - [`api`]: `(password, user_id)` entry points for the application layer

pub mod api;
pub mod batch;
mod error;
pub mod models;
mod protected;
pub mod secrets;
mod summary;
pub mod transform;

pub use batch::{
    decrypt_accounts, decrypt_accounts_concurrent, decrypt_transactions,
    decrypt_transactions_concurrent,
};
pub use error::{RecordError, RecordResult};
pub use models::{Account, AccountKind, AccountRow, Transaction, TransactionRow};
pub use protected::Protected;
pub use secrets::{AccountSecrets, SecretBundle, TransactionSecrets, SECRETS_VERSION};
pub use summary::NetWorthSummary;
pub use transform::{
    decrypt_account, decrypt_account_or_placeholder, decrypt_transaction,
    decrypt_transaction_or_placeholder, encrypt_account, encrypt_transaction,
    update_account_notes, update_transaction_notes, PLACEHOLDER_TEXT, SENTINEL_AMOUNT,
};
