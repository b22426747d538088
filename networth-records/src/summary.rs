//! Net-worth totals over decrypted accounts.

use crate::models::Account;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetWorthSummary {
    pub assets: f64,
    pub liabilities: f64,
    pub net_worth: f64,
    /// Visible, readable accounts that contributed to the totals.
    pub counted_accounts: usize,
    /// Visible accounts left out because they could not be decrypted.
    pub unreadable_accounts: usize,
}

impl NetWorthSummary {
    /// Hidden accounts are skipped. Placeholders are counted separately
    /// so the UI can flag that the totals are incomplete.
    pub fn from_accounts(accounts: &[Account]) -> Self {
        let mut summary = Self::default();
        for account in accounts.iter().filter(|a| !a.is_hidden) {
            if account.is_placeholder {
                summary.unreadable_accounts += 1;
                continue;
            }
            if account.kind.is_liability() {
                summary.liabilities += account.balance.abs();
            } else {
                summary.assets += account.balance;
            }
            summary.counted_accounts += 1;
        }
        summary.net_worth = summary.assets - summary.liabilities;
        summary
    }

    pub fn is_complete(&self) -> bool {
        self.unreadable_accounts == 0
    }
}
