use super::address::Address;
use super::amount::{Amount, PriceTotal};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};

/// Positional stats tuple as returned by the ledger's `getStats`.
///
/// Index 0 is the balance, 2 the credit used, 3 the spending cap. Index 1 is
/// reserved and ignored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletStats(pub Amount, pub Amount, pub Amount, pub Amount);

/// Snapshot of a pre-funded proxy wallet with an owner-set spending cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedWallet {
    pub address: Address,
    pub balance: Amount,
    pub spending_cap: Amount,
    pub credit_used: Amount,
}

impl DelegatedWallet {
    pub fn from_stats(address: Address, stats: WalletStats) -> Self {
        let WalletStats(balance, _, credit_used, spending_cap) = stats;
        Self {
            address,
            balance,
            spending_cap,
            credit_used,
        }
    }

    /// `spending_cap - credit_used`, clamped at zero. Display only.
    pub fn remaining_limit(&self) -> Amount {
        self.spending_cap.saturating_sub(self.credit_used)
    }

    /// Checks a cart total against this snapshot.
    ///
    /// The spending-limit check is the signed comparison
    /// `native > cap - used`, evaluated as `native + used > cap` so that an
    /// overdrawn wallet (used above cap) always trips it.
    pub fn validate(&self, required: &PriceTotal) -> WalletVerdict {
        WalletVerdict {
            required: required.native,
            balance: self.balance,
            remaining: self.remaining_limit(),
            insufficient_balance: required.native > self.balance,
            exceeds_spending_limit: required.native.saturating_add(self.credit_used)
                > self.spending_cap,
        }
    }
}

/// Advisory outcome of a delegated wallet check. Both flags may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletVerdict {
    pub required: Amount,
    pub balance: Amount,
    pub remaining: Amount,
    pub insufficient_balance: bool,
    pub exceeds_spending_limit: bool,
}

impl WalletVerdict {
    pub fn is_ok(&self) -> bool {
        !self.insufficient_balance && !self.exceeds_spending_limit
    }

    /// The warnings to surface, in display order.
    pub fn warnings(&self) -> Vec<StoreError> {
        let mut warnings = Vec::new();
        if self.insufficient_balance {
            warnings.push(StoreError::InsufficientBalance {
                required: self.required,
                available: self.balance,
            });
        }
        if self.exceeds_spending_limit {
            warnings.push(StoreError::ExceedsSpendingLimit {
                required: self.required,
                remaining: self.remaining,
            });
        }
        warnings
    }
}
