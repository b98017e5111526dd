use crate::domain::address::Address;
use crate::domain::order::Order;
use crate::domain::ports::LedgerRef;
use crate::domain::product::Product;
use crate::error::{Result, StoreError};
use tracing::warn;

/// Highest product id `products` will look up. Ids past it are not listed.
pub const MAX_CATALOG_SCAN: u64 = 10_000;

/// Product and order reads. Listing reads degrade to empty results when the
/// ledger cannot be reached.
pub struct Catalog {
    ledger: LedgerRef,
}

impl Catalog {
    pub fn new(ledger: LedgerRef) -> Self {
        Self { ledger }
    }

    /// Every listed product, in id order, up to [`MAX_CATALOG_SCAN`]. Ids the
    /// ledger no longer knows are skipped.
    pub async fn products(&self) -> Vec<Product> {
        let count = match self.ledger.product_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Failed to read product count");
                return Vec::new();
            }
        };

        if count > MAX_CATALOG_SCAN {
            warn!(count, limit = MAX_CATALOG_SCAN, "Product count exceeds scan limit");
        }

        let mut products = Vec::new();
        for id in 1..=count.min(MAX_CATALOG_SCAN) {
            match self.ledger.get_product(id).await {
                Ok(product) => products.push(product),
                Err(StoreError::ProductNotFound(_)) => {}
                Err(e) => {
                    warn!(product_id = id, error = %e, "Failed to read product");
                    return Vec::new();
                }
            }
        }
        products
    }

    pub async fn product(&self, product_id: u64) -> Result<Product> {
        self.ledger.get_product(product_id).await
    }

    /// Orders placed by `user`, oldest first.
    pub async fn orders(&self, user: &Address) -> Vec<Order> {
        let ids = match self.ledger.get_user_orders(user).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(user = %user, error = %e, "Failed to read user orders");
                return Vec::new();
            }
        };

        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            match self.ledger.get_order(id).await {
                Ok(order) => orders.push(order),
                Err(e) => warn!(order_id = id, error = %e, "Skipping unreadable order"),
            }
        }
        orders
    }
}
