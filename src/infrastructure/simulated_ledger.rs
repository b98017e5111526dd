use crate::domain::address::Address;
use crate::domain::amount::Amount;
use crate::domain::lifecycle::TxReference;
use crate::domain::order::{LedgerEvent, Order};
use crate::domain::payment::{CallDescriptor, EntryPoint};
use crate::domain::ports::{Ledger, ReceiptStatus};
use crate::domain::product::Product;
use crate::domain::wallet::WalletStats;
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct WalletAccount {
    owner: Address,
    stats: WalletStats,
}

#[derive(Debug)]
struct Submission {
    call: CallDescriptor,
    polls_remaining: u32,
    outcome: Option<ReceiptStatus>,
}

#[derive(Debug, Default)]
struct LedgerState {
    products: BTreeMap<u64, Product>,
    wallets: BTreeMap<Address, WalletAccount>,
    orders: Vec<Order>,
    user_orders: HashMap<Address, Vec<u64>>,
    submissions: HashMap<TxReference, Submission>,
    events: Vec<LedgerEvent>,
    tx_counter: u64,
    reject_next: Option<String>,
    fail_reads: bool,
    settle_after_polls: u32,
}

/// An in-process stand-in for the store contract and its delegated wallets.
///
/// Settlement follows the contract rules the storefront relies on: purchases
/// must attach at least the unit native price, delegated payments must fit the
/// wallet's balance and spending cap. `Clone` shares the underlying state.
#[derive(Clone)]
pub struct SimulatedLedger {
    store: Address,
    state: Arc<RwLock<LedgerState>>,
}

impl SimulatedLedger {
    /// Creates an empty ledger whose store contract lives at `store`.
    pub fn new(store: Address) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(LedgerState::default())),
        }
    }

    /// Lists a product and emits `ProductListed`. Relisting an id replaces it.
    pub async fn list_product(&self, product: Product) {
        let mut state = self.state.write().await;
        state.events.push(LedgerEvent::ProductListed {
            product_id: product.id,
            title: product.title.clone(),
            price_native: product.price_native,
            price_credit: product.price_credit,
            seller: product.seller.clone(),
        });
        state.products.insert(product.id, product);
    }

    /// Registers a delegated wallet owned by `owner`.
    pub async fn register_wallet(&self, owner: Address, wallet: Address, stats: WalletStats) {
        let mut state = self.state.write().await;
        state.wallets.insert(wallet, WalletAccount { owner, stats });
    }

    /// The next `submit` is refused as if the user declined it.
    pub async fn reject_next_submission(&self, reason: impl Into<String>) {
        self.state.write().await.reject_next = Some(reason.into());
    }

    /// Makes every read fail until switched off.
    pub async fn set_read_failure(&self, failing: bool) {
        self.state.write().await.fail_reads = failing;
    }

    /// Number of receipt polls that report `Pending` before a submission settles.
    pub async fn settle_after_polls(&self, polls: u32) {
        self.state.write().await.settle_after_polls = polls;
    }

    pub async fn events(&self) -> Vec<LedgerEvent> {
        self.state.read().await.events.clone()
    }

    async fn ensure_readable(&self) -> Result<()> {
        if self.state.read().await.fail_reads {
            return Err(StoreError::LedgerReadFailed(
                "ledger endpoint unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for SimulatedLedger {
    async fn product_count(&self) -> Result<u64> {
        self.ensure_readable().await?;
        let state = self.state.read().await;
        Ok(state.products.keys().next_back().copied().unwrap_or(0))
    }

    async fn get_product(&self, product_id: u64) -> Result<Product> {
        self.ensure_readable().await?;
        let state = self.state.read().await;
        state
            .products
            .get(&product_id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(product_id))
    }

    async fn get_wallets(&self, owner: &Address) -> Result<Vec<Address>> {
        self.ensure_readable().await?;
        let state = self.state.read().await;
        Ok(state
            .wallets
            .iter()
            .filter(|(_, account)| &account.owner == owner)
            .map(|(address, _)| address.clone())
            .collect())
    }

    async fn get_stats(&self, wallet: &Address) -> Result<WalletStats> {
        self.ensure_readable().await?;
        let state = self.state.read().await;
        state
            .wallets
            .get(wallet)
            .map(|account| account.stats)
            .ok_or_else(|| StoreError::LedgerReadFailed(format!("unknown wallet {wallet}")))
    }

    async fn get_order(&self, order_id: u64) -> Result<Order> {
        self.ensure_readable().await?;
        let state = self.state.read().await;
        state
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
            .ok_or_else(|| StoreError::LedgerReadFailed(format!("unknown order {order_id}")))
    }

    async fn get_user_orders(&self, user: &Address) -> Result<Vec<u64>> {
        self.ensure_readable().await?;
        let state = self.state.read().await;
        Ok(state.user_orders.get(user).cloned().unwrap_or_default())
    }

    async fn submit(&self, call: &CallDescriptor) -> Result<TxReference> {
        let mut state = self.state.write().await;
        if let Some(reason) = state.reject_next.take() {
            return Err(StoreError::SubmissionRejected(reason));
        }
        if call.target != self.store {
            return Err(StoreError::SubmissionRejected(format!(
                "no contract deployed at {}",
                call.target
            )));
        }

        state.tx_counter += 1;
        let tx = TxReference(format!("0x{:064x}", state.tx_counter));
        let polls_remaining = state.settle_after_polls;
        state.submissions.insert(
            tx.clone(),
            Submission {
                call: call.clone(),
                polls_remaining,
                outcome: None,
            },
        );
        Ok(tx)
    }

    async fn receipt(&self, tx: &TxReference) -> Result<ReceiptStatus> {
        let mut state = self.state.write().await;
        let Some(submission) = state.submissions.get_mut(tx) else {
            return Err(StoreError::LedgerReadFailed(format!("unknown transaction {tx}")));
        };
        if let Some(outcome) = &submission.outcome {
            return Ok(outcome.clone());
        }
        if submission.polls_remaining > 0 {
            submission.polls_remaining -= 1;
            return Ok(ReceiptStatus::Pending);
        }

        let call = submission.call.clone();
        let outcome = match execute(&mut state, &call) {
            Ok(order_id) => ReceiptStatus::Settled { order_id },
            Err(reason) => ReceiptStatus::Failed { reason },
        };
        if let Some(submission) = state.submissions.get_mut(tx) {
            submission.outcome = Some(outcome.clone());
        }
        Ok(outcome)
    }
}

/// Applies a call to the ledger state, returning the new order id or the
/// revert reason.
fn execute(state: &mut LedgerState, call: &CallDescriptor) -> std::result::Result<u64, String> {
    let product_id = call.product_id().ok_or("Missing product id")?;
    let target = call.address_arg().ok_or("Missing address argument")?.clone();
    let product = state
        .products
        .get(&product_id)
        .cloned()
        .ok_or("Product does not exist")?;
    if !product.is_active {
        return Err("Product is not active".to_string());
    }
    if product.stock == 0 {
        return Err("Out of stock".to_string());
    }

    let (buyer, agent_wallet, paid_native) = match call.entry_point {
        EntryPoint::Purchase => {
            let value = call.value.unwrap_or(Amount::ZERO);
            if value < product.price_native {
                return Err("Insufficient payment".to_string());
            }
            (target, None, value)
        }
        EntryPoint::RequestPaymentFromWallet => {
            let account = state
                .wallets
                .get_mut(&target)
                .ok_or("Unknown agent wallet")?;
            let WalletStats(balance, reserved, used, cap) = account.stats;
            let price = product.price_native;
            if balance < price {
                return Err("Insufficient wallet balance".to_string());
            }
            if used.saturating_add(price) > cap {
                return Err("Spending limit exceeded".to_string());
            }
            account.stats = WalletStats(
                balance.saturating_sub(price),
                reserved,
                used.saturating_add(price),
                cap,
            );
            (account.owner.clone(), Some(target), price)
        }
    };

    if let Some(listed) = state.products.get_mut(&product_id) {
        listed.stock -= 1;
    }

    let order_id = state.orders.len() as u64 + 1;
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    state.orders.push(Order {
        order_id,
        product_id,
        buyer: buyer.clone(),
        agent_wallet: agent_wallet.clone(),
        paid_native,
        paid_credit: Amount::ZERO,
        timestamp,
        fulfilled: false,
    });
    state
        .user_orders
        .entry(buyer.clone())
        .or_default()
        .push(order_id);
    state.events.push(LedgerEvent::OrderPlaced {
        order_id,
        product_id,
        buyer,
        agent_wallet,
        paid_native,
        paid_credit: Amount::ZERO,
    });
    Ok(order_id)
}
