//! Plaintext models and their persisted (row) forms.
//!
//! A row is what the database sees: the designated text column holds either
//! an `ENC:` envelope or a legacy plaintext value, and numeric columns hold
//! either the legacy value or a zero sentinel.

use chrono::NaiveDate;
use networth_crypto::is_encrypted;
use serde::{Deserialize, Serialize};

/// Account category. Stored in the clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Depository,
    Investment,
    Property,
    Credit,
    Loan,
    Other,
}

impl AccountKind {
    /// Balances of these kinds are amounts owed.
    pub fn is_liability(self) -> bool {
        matches!(self, Self::Credit | Self::Loan)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Depository => "depository",
            Self::Investment => "investment",
            Self::Property => "property",
            Self::Credit => "credit",
            Self::Loan => "loan",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "depository" => Some(Self::Depository),
            "investment" => Some(Self::Investment),
            "property" => Some(Self::Property),
            "credit" => Some(Self::Credit),
            "loan" => Some(Self::Loan),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A linked or manual account as the application sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub kind: AccountKind,
    pub name: String,
    pub balance: f64,
    pub notes: Option<String>,
    pub account_number: Option<String>,
    pub is_hidden: bool,
    /// Unix millis.
    pub created_at: i64,
    /// Set when the stored record could not be decrypted and the sensitive
    /// fields above are placeholders.
    #[serde(default)]
    pub is_placeholder: bool,
}

/// A single transaction as the application sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub merchant: Option<String>,
    pub category_name: Option<String>,
    pub notes: Option<String>,
    pub is_pending: bool,
    pub created_at: i64,
    #[serde(default)]
    pub is_placeholder: bool,
}

/// Persisted account.
///
/// Protected rows: `name` is an envelope bundling name, balance and notes;
/// `balance` is `0.0`; `notes` is `None`; `account_number` is its own envelope.
/// Legacy rows carry plaintext in every column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: String,
    pub user_id: String,
    pub kind: AccountKind,
    pub name: String,
    pub balance: f64,
    pub notes: Option<String>,
    pub account_number: Option<String>,
    pub is_hidden: bool,
    pub created_at: i64,
}

impl AccountRow {
    /// Whether the designated column holds an envelope.
    pub fn is_protected(&self) -> bool {
        is_encrypted(&self.name)
    }
}

/// Persisted transaction.
///
/// Protected rows: `description` is an envelope bundling description, amount,
/// merchant, category and notes; `amount` is `0.0`; the other sensitive
/// columns are `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub merchant: Option<String>,
    pub category_name: Option<String>,
    pub notes: Option<String>,
    pub is_pending: bool,
    pub created_at: i64,
}

impl TransactionRow {
    pub fn is_protected(&self) -> bool {
        is_encrypted(&self.description)
    }
}
