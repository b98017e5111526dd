use crate::domain::address::Address;
use crate::domain::ports::LedgerRef;
use crate::domain::wallet::DelegatedWallet;
use crate::error::Result;
use tracing::warn;

/// What the storefront can show for the delegated agent payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegatedWallets {
    /// No wallet factory is configured; the method is shown as unavailable.
    NotConfigured,
    Available(Vec<DelegatedWallet>),
}

/// Reads delegated wallet snapshots from the ledger.
pub struct WalletDirectory {
    ledger: LedgerRef,
    configured: bool,
}

impl WalletDirectory {
    pub fn new(ledger: LedgerRef, configured: bool) -> Self {
        Self { ledger, configured }
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Wallets owned by `owner` with their current stats.
    ///
    /// Read failures degrade to an empty list; a wallet whose stats cannot be
    /// read is left out.
    pub async fn list(&self, owner: &Address) -> DelegatedWallets {
        if !self.configured {
            return DelegatedWallets::NotConfigured;
        }

        let addresses = match self.ledger.get_wallets(owner).await {
            Ok(addresses) => addresses,
            Err(e) => {
                warn!(owner = %owner, error = %e, "Failed to list delegated wallets");
                return DelegatedWallets::Available(Vec::new());
            }
        };

        let mut wallets = Vec::with_capacity(addresses.len());
        for address in addresses {
            match self.snapshot(&address).await {
                Ok(wallet) => wallets.push(wallet),
                Err(e) => warn!(wallet = %address, error = %e, "Skipping delegated wallet"),
            }
        }
        DelegatedWallets::Available(wallets)
    }

    /// Fresh snapshot of a single wallet.
    pub async fn snapshot(&self, wallet: &Address) -> Result<DelegatedWallet> {
        let stats = self.ledger.get_stats(wallet).await?;
        Ok(DelegatedWallet::from_stats(wallet.clone(), stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::Amount;
    use crate::domain::wallet::WalletStats;
    use crate::infrastructure::simulated_ledger::SimulatedLedger;
    use std::sync::Arc;

    fn address(last: &str) -> Address {
        Address::parse(&format!("0x{:0>40}", last)).unwrap()
    }

    fn stats(balance: u64) -> WalletStats {
        WalletStats(Amount::from(balance), Amount::ZERO, Amount::ZERO, Amount::from(1000u64))
    }

    #[tokio::test]
    async fn test_not_configured() {
        let ledger = Arc::new(SimulatedLedger::new(address("5")));
        let directory = WalletDirectory::new(ledger, false);
        assert_eq!(directory.list(&address("b")).await, DelegatedWallets::NotConfigured);
    }

    #[tokio::test]
    async fn test_lists_owned_wallets() {
        let ledger = SimulatedLedger::new(address("5"));
        ledger.register_wallet(address("b"), address("a1"), stats(10)).await;
        ledger.register_wallet(address("b"), address("a2"), stats(20)).await;
        ledger.register_wallet(address("c"), address("a3"), stats(30)).await;

        let directory = WalletDirectory::new(Arc::new(ledger), true);
        let DelegatedWallets::Available(wallets) = directory.list(&address("b")).await else {
            panic!("expected wallets");
        };
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].address, address("a1"));
        assert_eq!(wallets[1].balance, Amount::from(20u64));
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_empty() {
        let ledger = SimulatedLedger::new(address("5"));
        ledger.register_wallet(address("b"), address("a1"), stats(10)).await;
        ledger.set_read_failure(true).await;

        let directory = WalletDirectory::new(Arc::new(ledger), true);
        assert_eq!(
            directory.list(&address("b")).await,
            DelegatedWallets::Available(Vec::new())
        );
    }
}
