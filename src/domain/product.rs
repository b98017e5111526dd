use super::address::Address;
use super::amount::{Amount, PriceTotal};
use serde::{Deserialize, Serialize};

/// Stock below which a product is flagged as running out.
pub const LOW_STOCK_THRESHOLD: u64 = 10;

/// A catalog entry as fetched from the ledger.
///
/// Immutable once fetched; the cart keeps a copy so it can be rendered
/// without a refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price_native: Amount,
    pub price_credit: Amount,
    pub seller: Address,
    pub is_active: bool,
    pub stock: u64,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    pub fn unit_price(&self) -> PriceTotal {
        PriceTotal::new(self.price_native, self.price_credit)
    }

    /// Whether the storefront offers "add to cart" for this product.
    pub fn is_purchasable(&self) -> bool {
        self.is_active && self.stock > 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::product;

    #[test]
    fn test_purchasable_requires_active_and_stock() {
        let mut p = product(1, 100, 50);
        assert!(p.is_purchasable());

        p.stock = 0;
        assert!(!p.is_purchasable());

        p.stock = 3;
        p.is_active = false;
        assert!(!p.is_purchasable());
    }

    #[test]
    fn test_low_stock() {
        let mut p = product(1, 100, 50);
        assert!(!p.is_low_stock());
        p.stock = 9;
        assert!(p.is_low_stock());
    }
}
