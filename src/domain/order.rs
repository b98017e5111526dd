use super::address::Address;
use super::amount::{Amount, PriceTotal};
use serde::{Deserialize, Serialize};

/// Read-only projection of an order recorded by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub product_id: u64,
    pub buyer: Address,
    /// Set when a delegated wallet paid on the buyer's behalf.
    pub agent_wallet: Option<Address>,
    pub paid_native: Amount,
    pub paid_credit: Amount,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub fulfilled: bool,
}

impl Order {
    pub fn paid(&self) -> PriceTotal {
        PriceTotal::new(self.paid_native, self.paid_credit)
    }
}

/// Events emitted by the store contract. Informational; the checkout flow
/// never waits on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    OrderPlaced {
        order_id: u64,
        product_id: u64,
        buyer: Address,
        agent_wallet: Option<Address>,
        paid_native: Amount,
        paid_credit: Amount,
    },
    ProductListed {
        product_id: u64,
        title: String,
        price_native: Amount,
        price_credit: Amount,
        seller: Address,
    },
}
