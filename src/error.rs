use crate::domain::amount::Amount;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Please connect your wallet first")]
    WalletNotConnected,
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Please select a delegated wallet")]
    NoDelegatedWalletSelected,
    #[error("Insufficient wallet balance: requires {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },
    #[error("Exceeds spending limit: requires {required}, remaining {remaining}")]
    ExceedsSpendingLimit { required: Amount, remaining: Amount },
    #[error("Transaction rejected: {0}")]
    SubmissionRejected(String),
    #[error("Transaction failed: {0}")]
    SubmissionFailed(String),
    #[error("Ledger read failed: {0}")]
    LedgerReadFailed(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("A checkout is already in progress")]
    CheckoutInProgress,
    #[error("Product {0} not found")]
    ProductNotFound(u64),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Errors raised locally before anything is dispatched to the ledger.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::WalletNotConnected
                | Self::EmptyCart
                | Self::NoDelegatedWalletSelected
                | Self::NotConfigured(_)
        )
    }

    /// Warnings that are displayed but never block a submission.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. } | Self::ExceedsSpendingLimit { .. }
        )
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for StoreError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Storage(e.into_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(StoreError::EmptyCart.is_precondition());
        assert!(StoreError::WalletNotConnected.is_precondition());
        assert!(!StoreError::SubmissionFailed("revert".into()).is_precondition());

        let warning = StoreError::ExceedsSpendingLimit {
            required: Amount::from(40u64),
            remaining: Amount::from(30u64),
        };
        assert!(warning.is_advisory());
        assert!(!warning.is_precondition());
        assert_eq!(
            warning.to_string(),
            "Exceeds spending limit: requires 40, remaining 30"
        );
    }
}
