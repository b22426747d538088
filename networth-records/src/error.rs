//! Record transformer error types.

use networth_crypto::CryptoError;
use thiserror::Error;

/// Result type for record transformations.
pub type RecordResult<T> = Result<T, RecordError>;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The envelope opened but its contents are not a secrets bundle.
    #[error("invalid secrets payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("unsupported secrets version {found} (newest known: {supported})")]
    UnsupportedVersion { found: u8, supported: u8 },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl RecordError {
    /// True when the record cannot be read with the current key.
    pub fn is_integrity_failure(&self) -> bool {
        match self {
            Self::Crypto(e) => e.is_integrity_failure(),
            Self::Payload(_) => true,
            Self::UnsupportedVersion { .. } | Self::InvalidField { .. } => false,
        }
    }

    /// Text suitable for a toast after an explicit user action.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Crypto(CryptoError::Unavailable(_)) => {
                "Encryption is not available in this environment."
            }
            e if e.is_integrity_failure() => "Could not decrypt your data. Check your password.",
            Self::UnsupportedVersion { .. } => {
                "This data was saved by a newer version of the app. Please update."
            }
            Self::InvalidField { .. } => "Some values are invalid and were not saved.",
            _ => "Something went wrong while protecting your data.",
        }
    }
}
