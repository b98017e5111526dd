//! Two-axis price aggregation and display formatting.
//!
//! All totals are exact integer sums; nothing here converts to floating
//! point, including the display path.

use super::amount::{Axis, PriceTotal};
use super::cart::{Cart, CartLine};

/// Unit prices multiplied by the line quantity on both axes.
pub fn line_total(line: &CartLine) -> PriceTotal {
    PriceTotal::new(
        line.product.price_native.saturating_mul(line.quantity),
        line.product.price_credit.saturating_mul(line.quantity),
    )
}

/// Sum of every line total; `(0, 0)` for an empty cart.
pub fn cart_total(cart: &Cart) -> PriceTotal {
    cart.lines()
        .iter()
        .fold(PriceTotal::ZERO, |total, line| total + line_total(line))
}

/// Renders `"100 SHM + 50 USDT"`, omitting zero axes, or `"Free"`.
pub fn format_price(total: &PriceTotal) -> String {
    let parts: Vec<String> = [Axis::Native, Axis::Credit]
        .into_iter()
        .filter(|axis| !total.get(*axis).is_zero())
        .map(|axis| format!("{} {}", total.get(axis).major_units(), axis.symbol()))
        .collect();

    if parts.is_empty() {
        String::from("Free")
    } else {
        parts.join(" + ")
    }
}
