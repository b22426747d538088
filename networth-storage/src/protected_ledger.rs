//! Session-aware read/write boundary over [`LedgerStore`].
//!
//! Writes encrypt with the signed-in user's key before anything reaches the
//! database. Reads of whole views degrade per record to placeholders;
//! reads and edits of a single record surface their errors.
//!
//! Every operation fetches the session key first, so a signed-out session
//! fails with `MissingKey` before the store is read or written. Records
//! owned by another user, and transactions pointing at another user's
//! account, are refused on every read and write.

use crate::error::{LedgerError, LedgerResult};
use crate::ledger_store::LedgerStore;
use networth_crypto::{derive_key_with_params, DerivedKey};
use networth_records::{
    decrypt_account, decrypt_accounts, decrypt_accounts_concurrent, decrypt_transaction,
    decrypt_transactions, decrypt_transactions_concurrent, encrypt_account, encrypt_transaction,
    update_account_notes, update_transaction_notes, Account, AccountRow, NetWorthSummary,
    RecordError, Transaction, TransactionRow,
};
use networth_session::SessionContext;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ProtectedLedger {
    store: LedgerStore,
    session: SessionContext,
}

impl ProtectedLedger {
    pub fn new(store: LedgerStore, session: SessionContext) -> Self {
        Self { store, session }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn user_id(&self) -> &str {
        self.session.user_id()
    }

    fn check_owner(&self, id: &str, owner: &str) -> LedgerResult<()> {
        if owner != self.user_id() {
            return Err(LedgerError::ForeignRecord(id.to_string()));
        }
        Ok(())
    }

    fn require_key(&self) -> LedgerResult<DerivedKey> {
        Ok(self.session.key()?)
    }

    fn owned_account_row(&self, id: &str) -> LedgerResult<AccountRow> {
        let row = self
            .store
            .get_account_row(id)?
            .ok_or_else(|| LedgerError::NotFound(format!("account {id}")))?;
        self.check_owner(id, &row.user_id)?;
        Ok(row)
    }

    fn owned_transaction_row(&self, id: &str) -> LedgerResult<TransactionRow> {
        let row = self
            .store
            .get_transaction_row(id)?
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {id}")))?;
        self.check_owner(id, &row.user_id)?;
        Ok(row)
    }

    // ── Accounts ─────────────────────────────────────────────────

    /// Encrypts and upserts. An existing row with the same id must already
    /// belong to the session user.
    pub fn save_account(&self, account: &Account) -> LedgerResult<()> {
        let key = self.require_key()?;
        self.check_owner(&account.id, &account.user_id)?;
        if let Some(existing) = self.store.get_account_row(&account.id)? {
            self.check_owner(&account.id, &existing.user_id)?;
        }
        let row = encrypt_account(account, &key)?;
        self.store.upsert_account_row(&row)
    }

    /// All of the user's accounts. Unreadable ones come back as placeholders.
    pub fn load_accounts(&self) -> LedgerResult<Vec<Account>> {
        let key = self.require_key()?;
        let rows = self.store.list_account_rows(self.user_id())?;
        debug!(count = rows.len(), "loading accounts");
        Ok(decrypt_accounts(&rows, &key))
    }

    pub async fn load_accounts_concurrent(&self) -> LedgerResult<Vec<Account>> {
        let key = Arc::new(self.require_key()?);
        let rows = self.store.list_account_rows(self.user_id())?;
        Ok(decrypt_accounts_concurrent(rows, key).await)
    }

    /// One account, strictly: a decryption failure is an error here.
    pub fn load_account(&self, id: &str) -> LedgerResult<Account> {
        let key = self.require_key()?;
        let row = self.owned_account_row(id)?;
        Ok(decrypt_account(&row, &key)?)
    }

    pub fn update_account_notes(&self, id: &str, notes: Option<String>) -> LedgerResult<()> {
        let key = self.require_key()?;
        let row = self.owned_account_row(id)?;
        let updated = update_account_notes(&row, &key, notes)?;
        self.store.upsert_account_row(&updated)
    }

    /// Deletes the account and its transactions.
    pub fn delete_account(&self, id: &str) -> LedgerResult<()> {
        self.require_key()?;
        self.owned_account_row(id)?;
        self.store.delete_account(id)
    }

    // ── Transactions ─────────────────────────────────────────────

    /// Encrypts and upserts. The referenced account, and any existing row
    /// with the same id, must belong to the session user.
    pub fn save_transaction(&self, tx: &Transaction) -> LedgerResult<()> {
        let key = self.require_key()?;
        self.check_owner(&tx.id, &tx.user_id)?;
        self.owned_account_row(&tx.account_id)?;
        if let Some(existing) = self.store.get_transaction_row(&tx.id)? {
            self.check_owner(&tx.id, &existing.user_id)?;
        }
        let row = encrypt_transaction(tx, &key)?;
        self.store.upsert_transaction_row(&row)
    }

    /// Transactions of one account, newest first.
    pub fn load_transactions(&self, account_id: &str) -> LedgerResult<Vec<Transaction>> {
        let key = self.require_key()?;
        let rows: Vec<_> = self
            .store
            .list_transaction_rows(account_id)?
            .into_iter()
            .filter(|r| r.user_id == self.user_id())
            .collect();
        debug!(count = rows.len(), account_id, "loading transactions");
        Ok(decrypt_transactions(&rows, &key))
    }

    /// All of the user's transactions, fanned out over the blocking pool.
    pub async fn load_all_transactions_concurrent(&self) -> LedgerResult<Vec<Transaction>> {
        let key = Arc::new(self.require_key()?);
        let rows = self.store.list_user_transaction_rows(self.user_id())?;
        Ok(decrypt_transactions_concurrent(rows, key).await)
    }

    pub fn load_transaction(&self, id: &str) -> LedgerResult<Transaction> {
        let key = self.require_key()?;
        let row = self.owned_transaction_row(id)?;
        Ok(decrypt_transaction(&row, &key)?)
    }

    pub fn update_transaction_notes(&self, id: &str, notes: Option<String>) -> LedgerResult<()> {
        let key = self.require_key()?;
        let row = self.owned_transaction_row(id)?;
        let updated = update_transaction_notes(&row, &key, notes)?;
        self.store.upsert_transaction_row(&updated)
    }

    // ── Maintenance ──────────────────────────────────────────────

    /// Rewrites the user's legacy plaintext rows in protected form, including
    /// protected rows whose account number is still in the clear.
    ///
    /// Returns the number of rows rewritten. Stops at the first failure;
    /// rows already rewritten stay rewritten.
    pub fn seal_legacy_rows(&self) -> LedgerResult<usize> {
        let key = self.require_key()?;
        let mut sealed = 0;

        for row in self.store.list_legacy_account_rows(self.user_id())? {
            let account = decrypt_account(&row, &key)?;
            self.store.upsert_account_row(&encrypt_account(&account, &key)?)?;
            sealed += 1;
        }
        for row in self.store.list_legacy_transaction_rows(self.user_id())? {
            let tx = decrypt_transaction(&row, &key)?;
            self.store.upsert_transaction_row(&encrypt_transaction(&tx, &key)?)?;
            sealed += 1;
        }

        debug!(sealed, "sealed legacy rows");
        Ok(sealed)
    }

    /// Checks `candidate` against the first protected record of the user.
    ///
    /// Requires an active session. With no protected records there is
    /// nothing to check against and the candidate is accepted.
    pub fn verify_password(&self, candidate: &str) -> LedgerResult<()> {
        self.session.password()?;
        let key = derive_key_with_params(candidate, self.user_id(), self.session.params())
            .map_err(RecordError::from)?;

        if let Some(row) = self
            .store
            .list_account_rows(self.user_id())?
            .into_iter()
            .find(|r| r.is_protected())
        {
            decrypt_account(&row, &key)?;
            return Ok(());
        }
        if let Some(row) = self
            .store
            .list_user_transaction_rows(self.user_id())?
            .into_iter()
            .find(|r| r.is_protected())
        {
            decrypt_transaction(&row, &key)?;
        }
        Ok(())
    }

    pub fn net_worth(&self) -> LedgerResult<NetWorthSummary> {
        Ok(NetWorthSummary::from_accounts(&self.load_accounts()?))
    }
}
