use super::amount::PriceTotal;
use super::pricing;
use super::product::Product;
use serde::{Deserialize, Serialize};

/// A product snapshot and how many units of it the buyer wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u64,
}

impl CartLine {
    pub fn new(product: Product, quantity: u64) -> Self {
        Self { product, quantity }
    }

    pub fn total(&self) -> PriceTotal {
        pricing::line_total(self)
    }

    /// Upper bound the storefront applies to the "+" control. The cart itself
    /// does not enforce stock.
    pub fn can_increment(&self) -> bool {
        self.quantity < self.product.stock
    }
}

/// Ordered cart lines, at most one per product id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLine>,
}

impl Cart {
    /// Builds a cart from raw lines, dropping empty ones and merging
    /// duplicates into the first occurrence.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::default();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.line_mut(line.product.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity)
                }
                None => cart.items.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    pub fn line(&self, product_id: u64) -> Option<&CartLine> {
        self.items.iter().find(|l| l.product.id == product_id)
    }

    fn line_mut(&mut self, product_id: u64) -> Option<&mut CartLine> {
        self.items.iter_mut().find(|l| l.product.id == product_id)
    }

    /// The line a checkout submits. Only one line goes out per call.
    pub fn first_line(&self) -> Option<&CartLine> {
        self.items.first()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Adds one unit, appending a new line if the product is not in the cart yet.
    pub fn add(&mut self, product: &Product) {
        match self.line_mut(product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.items.push(CartLine::new(product.clone(), 1)),
        }
    }

    pub fn remove(&mut self, product_id: u64) {
        self.items.retain(|l| l.product.id != product_id);
    }

    /// Replaces the quantity of an existing line; `quantity <= 0` removes it.
    pub fn update(&mut self, product_id: u64, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity.unsigned_abs();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities, not the number of lines.
    pub fn total_items(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |sum, l| sum.saturating_add(l.quantity))
    }

    pub fn total(&self) -> PriceTotal {
        pricing::cart_total(self)
    }
}
