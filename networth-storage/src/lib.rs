//! DuckDB ledger storage for the net-worth tracker.
//!
//! This crate is the boundary where plaintext becomes ciphertext. Everything
//! below [`LedgerStore`] sees only protected (or legacy) rows; everything
//! above [`ProtectedLedger`] sees only plaintext models.
//!
//! # Architecture
//!
//! - [`LedgerStore`]: raw account/transaction tables, no cryptography
//! - [`ProtectedLedger`]: encrypt-on-write, decrypt-on-read using the
//!   signed-in user's session key

mod error;
mod ledger_store;
mod protected_ledger;

pub use error::{LedgerError, LedgerResult};
pub use ledger_store::LedgerStore;
pub use protected_ledger::ProtectedLedger;

use std::path::Path;
use tracing::warn;

/// Per-ledger DuckDB resource caps.
///
/// A ledger holds one user's accounts and transactions, so the defaults are
/// small; DuckDB's own defaults claim most of RAM and every core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLimits {
    /// DuckDB size string, e.g. `"128MB"`.
    pub memory_limit: String,
    pub threads: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            memory_limit: "128MB".to_string(),
            threads: 1,
        }
    }
}

/// Opens the ledger database file, applying `limits`.
///
/// A crash can leave a `.wal` file next to the ledger that DuckDB refuses to
/// replay. When the first open fails and such a file exists, it is removed
/// and the open retried once; otherwise the original error is returned.
pub fn open_ledger_connection(
    path: &Path,
    limits: &ResourceLimits,
) -> LedgerResult<duckdb::Connection> {
    let conn = match duckdb::Connection::open(path) {
        Ok(conn) => conn,
        Err(first_err) => {
            let wal_path = wal_path_for(path);
            if !wal_path.exists() || std::fs::remove_file(&wal_path).is_err() {
                return Err(first_err.into());
            }
            warn!(
                wal = %wal_path.display(),
                "ledger open failed, removed stale WAL and retrying: {first_err}"
            );
            duckdb::Connection::open(path)?
        }
    };
    conn.execute_batch(&format!(
        "PRAGMA memory_limit='{}'; PRAGMA threads={};",
        limits.memory_limit, limits.threads
    ))?;
    Ok(conn)
}

/// `ledger.duckdb` -> `ledger.duckdb.wal`, `ledger` -> `ledger.wal`.
fn wal_path_for(path: &Path) -> std::path::PathBuf {
    let ext = path
        .extension()
        .map(|ext| format!("{}.wal", ext.to_string_lossy()))
        .unwrap_or_else(|| "wal".to_string());
    path.with_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wal_sits_next_to_ledger() {
        assert_eq!(
            wal_path_for(Path::new("/data/ledger.duckdb")),
            Path::new("/data/ledger.duckdb.wal")
        );
        assert_eq!(wal_path_for(Path::new("/data/ledger")), Path::new("/data/ledger.wal"));
    }
}
