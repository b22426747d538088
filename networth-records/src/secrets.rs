//! Versioned bundles of the sensitive fields of a record.
//!
//! Each record is sealed as ONE envelope holding a compact JSON object, so
//! the envelope count never reveals which fields are populated. The object
//! carries `"v"`; bundles without it predate versioning and read as v1.
//! Optional fields default when absent, so adding one later keeps older
//! envelopes readable.

use crate::error::{RecordError, RecordResult};
use networth_crypto::{DerivedKey, Envelope};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Newest bundle version this build writes and understands.
pub const SECRETS_VERSION: u8 = 1;

fn unversioned() -> u8 {
    1
}

/// Common behaviour of the per-entity bundles.
pub trait SecretBundle: Serialize + DeserializeOwned {
    fn version(&self) -> u8;

    /// Rejects values that would not survive the JSON round trip.
    fn validate(&self) -> RecordResult<()>;

    fn seal(&self, key: &DerivedKey) -> RecordResult<Envelope> {
        self.validate()?;
        let json = serde_json::to_vec(self)?;
        Ok(Envelope::seal(key, &json)?)
    }

    fn open(envelope: &Envelope, key: &DerivedKey) -> RecordResult<Self> {
        let json = envelope.open(key)?;
        let bundle: Self = serde_json::from_slice(&json)?;
        if bundle.version() > SECRETS_VERSION {
            return Err(RecordError::UnsupportedVersion {
                found: bundle.version(),
                supported: SECRETS_VERSION,
            });
        }
        Ok(bundle)
    }
}

fn finite(field: &'static str, value: f64) -> RecordResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RecordError::InvalidField {
            field,
            reason: format!("{value} is not a finite number"),
        })
    }
}

/// Sensitive fields of an account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountSecrets {
    #[serde(rename = "v", default = "unversioned")]
    pub version: u8,
    pub name: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AccountSecrets {
    pub fn new(name: impl Into<String>, balance: f64, notes: Option<String>) -> Self {
        Self {
            version: SECRETS_VERSION,
            name: name.into(),
            balance,
            notes,
        }
    }
}

impl SecretBundle for AccountSecrets {
    fn version(&self) -> u8 {
        self.version
    }

    fn validate(&self) -> RecordResult<()> {
        finite("balance", self.balance)
    }
}

/// Sensitive fields of a transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionSecrets {
    #[serde(rename = "v", default = "unversioned")]
    pub version: u8,
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TransactionSecrets {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        merchant: Option<String>,
        category_name: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            version: SECRETS_VERSION,
            description: description.into(),
            amount,
            merchant,
            category_name,
            notes,
        }
    }
}

impl SecretBundle for TransactionSecrets {
    fn version(&self) -> u8 {
        self.version
    }

    fn validate(&self) -> RecordResult<()> {
        finite("amount", self.amount)
    }
}
