use super::address::Address;
use super::cart::Cart;
use super::lifecycle::TxReference;
use super::order::Order;
use super::payment::CallDescriptor;
use super::product::Product;
use super::wallet::WalletStats;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable home of the cart between sessions.
///
/// Synchronous: cart operations run to completion and persist as part of the
/// same call.
pub trait CartRepository: Send + Sync {
    fn load(&self) -> Result<Option<Cart>>;
    fn save(&self, cart: &Cart) -> Result<()>;
}

pub type CartRepositoryBox = Box<dyn CartRepository>;

/// Settlement status of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptStatus {
    Pending,
    Settled { order_id: u64 },
    Failed { reason: String },
}

/// The external system of record for products, wallets and orders.
///
/// Read failures surface as `StoreError::LedgerReadFailed`. `submit` fails
/// with `StoreError::SubmissionRejected` when the call is refused before the
/// ledger acknowledges it.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn product_count(&self) -> Result<u64>;
    async fn get_product(&self, product_id: u64) -> Result<Product>;
    async fn get_wallets(&self, owner: &Address) -> Result<Vec<Address>>;
    async fn get_stats(&self, wallet: &Address) -> Result<WalletStats>;
    async fn get_order(&self, order_id: u64) -> Result<Order>;
    async fn get_user_orders(&self, user: &Address) -> Result<Vec<u64>>;
    async fn submit(&self, call: &CallDescriptor) -> Result<TxReference>;
    async fn receipt(&self, tx: &TxReference) -> Result<ReceiptStatus>;
}

pub type LedgerRef = Arc<dyn Ledger>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

pub type NavigatorRef = Arc<dyn Navigator>;
