//! Legacy-or-sealed column values, resolved once at read time.

use crate::error::RecordResult;
use crate::secrets::SecretBundle;
use networth_crypto::{DerivedKey, Envelope};

/// A stored value that is either legacy plaintext or an envelope.
///
/// Built from the raw column by [`Protected::from_column`] and turned into
/// `T` by [`Protected::resolve`]; nothing downstream re-inspects the tag.
#[derive(Clone, Debug, PartialEq)]
pub enum Protected<T> {
    Plaintext(T),
    Sealed(Envelope),
}

impl<T> Protected<T> {
    /// Classifies `raw`. For untagged values, `legacy` rebuilds `T` from the
    /// plaintext columns of the row.
    pub fn from_column(raw: String, legacy: impl FnOnce(String) -> T) -> Self {
        match Envelope::classify(raw) {
            Ok(envelope) => Self::Sealed(envelope),
            Err(plain) => Self::Plaintext(legacy(plain)),
        }
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed(_))
    }
}

impl<T: SecretBundle> Protected<T> {
    pub fn resolve(self, key: &DerivedKey) -> RecordResult<T> {
        match self {
            Self::Plaintext(value) => Ok(value),
            Self::Sealed(envelope) => T::open(&envelope, key),
        }
    }
}

impl Protected<String> {
    /// Single-field form, for values sealed on their own (e.g. account numbers).
    pub fn field(raw: String) -> Self {
        Self::from_column(raw, |plain| plain)
    }

    pub fn resolve_string(self, key: &DerivedKey) -> RecordResult<String> {
        match self {
            Self::Plaintext(value) => Ok(value),
            Self::Sealed(envelope) => Ok(envelope.open_string(key)?),
        }
    }
}
