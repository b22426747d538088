//! Ledger storage error types.

use networth_records::RecordError;
use networth_session::SessionError;
use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Storage(#[from] duckdb::Error),

    #[error("storage lock poisoned: {0}")]
    Lock(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A cleartext column holds something the schema does not allow.
    #[error("corrupt row {id}: {reason}")]
    CorruptRow { id: String, reason: String },

    #[error("record {0} belongs to another user")]
    ForeignRecord(String),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),
}

impl LedgerError {
    /// Text for the user. Missing keys always mean "sign in again".
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Session(SessionError::MissingKey) => "Your session has expired. Please sign in again.",
            Self::Session(SessionError::Crypto(_)) => "Could not unlock your data. Please sign in again.",
            Self::Record(e) => e.user_message(),
            Self::NotFound(_) => "That item no longer exists.",
            Self::ForeignRecord(_) => "That item belongs to a different account.",
            Self::Storage(_) | Self::Lock(_) | Self::CorruptRow { .. } => {
                "Could not access local storage."
            }
        }
    }

    /// Toast for a failed explicit action, e.g. `toast("save notes")`.
    pub fn toast(&self, action: &str) -> String {
        format!("Failed to {action}. {}", self.user_message())
    }
}
