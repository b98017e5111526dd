use crate::domain::address::Address;
use crate::domain::amount::Amount;
use crate::domain::wallet::WalletStats;
use crate::error::{Result, StoreError};
use serde::Deserialize;
use std::io::Read;

/// One delegated wallet as listed in a wallets CSV.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalletRecord {
    pub owner: Address,
    pub address: Address,
    pub balance: Amount,
    pub spending_cap: Amount,
    #[serde(default)]
    pub credit_used: Amount,
}

impl WalletRecord {
    /// Stats in the ledger's positional layout.
    pub fn stats(&self) -> WalletStats {
        WalletStats(self.balance, Amount::ZERO, self.credit_used, self.spending_cap)
    }
}

/// Reads delegated wallets from a CSV source.
///
/// Expected header: `owner,address,balance,spending_cap,credit_used`.
pub struct WalletReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> WalletReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn wallets(self) -> impl Iterator<Item = Result<WalletRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(StoreError::from))
    }
}
