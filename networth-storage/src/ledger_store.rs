//! Raw ledger tables.
//!
//! This layer stores rows exactly as given: it never encrypts or decrypts.
//! The `name` (accounts) and `description` (transactions) columns hold
//! either an `ENC:` envelope or legacy plaintext; numeric columns hold the
//! legacy value or the zero sentinel. Everything else is cleartext.

use crate::error::{LedgerError, LedgerResult};
use crate::{open_ledger_connection, ResourceLimits};
use chrono::{NaiveDate, Utc};
use duckdb::{params, Connection};
use networth_records::{AccountKind, AccountRow, TransactionRow};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const ACCOUNT_COLUMNS: &str =
    "id, user_id, kind, name, balance, notes, account_number, is_hidden, created_at";

const TRANSACTION_COLUMNS: &str = "id, user_id, account_id, date, description, amount, \
     merchant, category_name, notes, is_pending, created_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// DuckDB-backed store for account and transaction rows.
#[derive(Clone)]
pub struct LedgerStore {
    conn: Arc<Mutex<Connection>>,
}

impl LedgerStore {
    /// Opens or creates a ledger at the given path with default limits.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        Self::open_with_limits(path, &ResourceLimits::default())
    }

    pub fn open_with_limits(path: &Path, limits: &ResourceLimits) -> LedgerResult<Self> {
        let conn = open_ledger_connection(path, limits)?;
        initialize_ledger_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory ledger (for testing).
    pub fn open_in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_ledger_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| LedgerError::Lock(e.to_string()))
    }

    // ── Accounts ─────────────────────────────────────────────────

    /// Inserts or replaces an account row.
    pub fn upsert_account_row(&self, row: &AccountRow) -> LedgerResult<()> {
        let conn = self.lock()?;
        let now = Utc::now().timestamp_millis();
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO accounts ({ACCOUNT_COLUMNS}, modified_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                row.id,
                row.user_id,
                row.kind.as_str(),
                row.name,
                row.balance,
                row.notes.as_deref(),
                row.account_number.as_deref(),
                row.is_hidden,
                row.created_at,
                now,
            ],
        )?;
        Ok(())
    }

    pub fn get_account_row(&self, id: &str) -> LedgerResult<Option<AccountRow>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"))?;
        let raw = stmt
            .query_map(params![id], read_raw_account)?
            .next()
            .transpose()?;
        raw.map(RawAccount::into_row).transpose()
    }

    /// All account rows of a user, oldest first.
    pub fn list_account_rows(&self, user_id: &str) -> LedgerResult<Vec<AccountRow>> {
        self.query_accounts(
            &format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = ? ORDER BY created_at, id"
            ),
            user_id,
        )
    }

    /// Account rows of a user with any sensitive column not yet an envelope:
    /// the bundle column, or an account number still in the clear.
    pub fn list_legacy_account_rows(&self, user_id: &str) -> LedgerResult<Vec<AccountRow>> {
        self.query_accounts(
            &format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts \
                 WHERE user_id = ? \
                 AND (NOT starts_with(name, 'ENC:') \
                      OR (account_number IS NOT NULL AND NOT starts_with(account_number, 'ENC:'))) \
                 ORDER BY created_at, id"
            ),
            user_id,
        )
    }

    fn query_accounts(&self, sql: &str, user_id: &str) -> LedgerResult<Vec<AccountRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let raws = stmt
            .query_map(params![user_id], read_raw_account)?
            .collect::<Result<Vec<_>, _>>()?;
        raws.into_iter().map(RawAccount::into_row).collect()
    }

    /// Deletes an account and its transactions.
    pub fn delete_account(&self, id: &str) -> LedgerResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM transactions WHERE account_id = ?", params![id])?;
        let affected = conn.execute("DELETE FROM accounts WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(LedgerError::NotFound(format!("account {id}")));
        }
        Ok(())
    }

    // ── Transactions ─────────────────────────────────────────────

    pub fn upsert_transaction_row(&self, row: &TransactionRow) -> LedgerResult<()> {
        let conn = self.lock()?;
        let now = Utc::now().timestamp_millis();
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO transactions ({TRANSACTION_COLUMNS}, modified_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                row.id,
                row.user_id,
                row.account_id,
                row.date.format(DATE_FORMAT).to_string(),
                row.description,
                row.amount,
                row.merchant.as_deref(),
                row.category_name.as_deref(),
                row.notes.as_deref(),
                row.is_pending,
                row.created_at,
                now,
            ],
        )?;
        Ok(())
    }

    pub fn get_transaction_row(&self, id: &str) -> LedgerResult<Option<TransactionRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?"
        ))?;
        let raw = stmt
            .query_map(params![id], read_raw_transaction)?
            .next()
            .transpose()?;
        raw.map(RawTransaction::into_row).transpose()
    }

    /// Transactions of one account, newest first.
    pub fn list_transaction_rows(&self, account_id: &str) -> LedgerResult<Vec<TransactionRow>> {
        self.query_transactions(
            &format!(
                "SELECT {TRANSACTION_COLUMNS} FROM transactions \
                 WHERE account_id = ? ORDER BY date DESC, created_at DESC, id"
            ),
            account_id,
        )
    }

    /// Transactions of a user across accounts, newest first.
    pub fn list_user_transaction_rows(&self, user_id: &str) -> LedgerResult<Vec<TransactionRow>> {
        self.query_transactions(
            &format!(
                "SELECT {TRANSACTION_COLUMNS} FROM transactions \
                 WHERE user_id = ? ORDER BY date DESC, created_at DESC, id"
            ),
            user_id,
        )
    }

    pub fn list_legacy_transaction_rows(&self, user_id: &str) -> LedgerResult<Vec<TransactionRow>> {
        self.query_transactions(
            &format!(
                "SELECT {TRANSACTION_COLUMNS} FROM transactions \
                 WHERE user_id = ? AND NOT starts_with(description, 'ENC:') \
                 ORDER BY date DESC, created_at DESC, id"
            ),
            user_id,
        )
    }

    fn query_transactions(&self, sql: &str, key: &str) -> LedgerResult<Vec<TransactionRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let raws = stmt
            .query_map(params![key], read_raw_transaction)?
            .collect::<Result<Vec<_>, _>>()?;
        raws.into_iter().map(RawTransaction::into_row).collect()
    }

    pub fn delete_transaction(&self, id: &str) -> LedgerResult<()> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(LedgerError::NotFound(format!("transaction {id}")));
        }
        Ok(())
    }
}

// ── Row mapping ──────────────────────────────────────────────────

/// Account row with enum/date columns still as text.
struct RawAccount {
    id: String,
    user_id: String,
    kind: String,
    name: String,
    balance: f64,
    notes: Option<String>,
    account_number: Option<String>,
    is_hidden: bool,
    created_at: i64,
}

fn read_raw_account(row: &duckdb::Row<'_>) -> duckdb::Result<RawAccount> {
    Ok(RawAccount {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        name: row.get(3)?,
        balance: row.get(4)?,
        notes: row.get(5)?,
        account_number: row.get(6)?,
        is_hidden: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl RawAccount {
    fn into_row(self) -> LedgerResult<AccountRow> {
        let kind = AccountKind::parse(&self.kind).ok_or_else(|| LedgerError::CorruptRow {
            id: self.id.clone(),
            reason: format!("unknown account kind {:?}", self.kind),
        })?;
        Ok(AccountRow {
            id: self.id,
            user_id: self.user_id,
            kind,
            name: self.name,
            balance: self.balance,
            notes: self.notes,
            account_number: self.account_number,
            is_hidden: self.is_hidden,
            created_at: self.created_at,
        })
    }
}

struct RawTransaction {
    id: String,
    user_id: String,
    account_id: String,
    date: String,
    description: String,
    amount: f64,
    merchant: Option<String>,
    category_name: Option<String>,
    notes: Option<String>,
    is_pending: bool,
    created_at: i64,
}

fn read_raw_transaction(row: &duckdb::Row<'_>) -> duckdb::Result<RawTransaction> {
    Ok(RawTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        account_id: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        amount: row.get(5)?,
        merchant: row.get(6)?,
        category_name: row.get(7)?,
        notes: row.get(8)?,
        is_pending: row.get(9)?,
        created_at: row.get(10)?,
    })
}

impl RawTransaction {
    fn into_row(self) -> LedgerResult<TransactionRow> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            LedgerError::CorruptRow {
                id: self.id.clone(),
                reason: format!("bad date {:?}: {e}", self.date),
            }
        })?;
        Ok(TransactionRow {
            id: self.id,
            user_id: self.user_id,
            account_id: self.account_id,
            date,
            description: self.description,
            amount: self.amount,
            merchant: self.merchant,
            category_name: self.category_name,
            notes: self.notes,
            is_pending: self.is_pending,
            created_at: self.created_at,
        })
    }
}

fn initialize_ledger_schema(conn: &Connection) -> LedgerResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id VARCHAR PRIMARY KEY,
            user_id VARCHAR NOT NULL,
            kind VARCHAR NOT NULL,
            name VARCHAR NOT NULL,
            balance DOUBLE NOT NULL DEFAULT 0,
            notes VARCHAR,
            account_number VARCHAR,
            is_hidden BOOLEAN NOT NULL DEFAULT FALSE,
            created_at BIGINT NOT NULL,
            modified_at BIGINT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS transactions (
            id VARCHAR PRIMARY KEY,
            user_id VARCHAR NOT NULL,
            account_id VARCHAR NOT NULL,
            date VARCHAR NOT NULL,
            description VARCHAR NOT NULL,
            amount DOUBLE NOT NULL DEFAULT 0,
            merchant VARCHAR,
            category_name VARCHAR,
            notes VARCHAR,
            is_pending BOOLEAN NOT NULL DEFAULT FALSE,
            created_at BIGINT NOT NULL,
            modified_at BIGINT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
