//! Plain-text rendering of storefront state for the command line.

use crate::application::wallets::DelegatedWallets;
use crate::domain::amount::{Axis, PriceTotal};
use crate::domain::cart::Cart;
use crate::domain::order::Order;
use crate::domain::ports::{Destination, Navigator};
use crate::domain::pricing::{format_price, line_total};
use crate::domain::product::Product;
use std::io::{self, Write};

/// Follows navigation requests by announcing them on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, destination: Destination) {
        println!("Redirecting to {}", destination.path());
    }
}

pub fn write_products<W: Write>(out: &mut W, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products available");
    }
    for product in products {
        let mut flags = Vec::new();
        if !product.is_active {
            flags.push("inactive");
        } else if product.stock == 0 {
            flags.push("out of stock");
        } else if product.is_low_stock() {
            flags.push("low stock");
        }
        write!(
            out,
            "#{} {} | {} | stock {}",
            product.id,
            product.title,
            format_price(&product.unit_price()),
            product.stock
        )?;
        if !flags.is_empty() {
            write!(out, " ({})", flags.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_cart<W: Write>(out: &mut W, cart: &Cart) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty");
    }
    for line in cart.lines() {
        writeln!(
            out,
            "#{} {} x{} = {}",
            line.product.id,
            line.product.title,
            line.quantity,
            format_price(&line_total(line))
        )?;
    }
    writeln!(out, "Items: {}", cart.total_items())?;
    writeln!(out, "Total: {}", format_price(&cart.total()))
}

pub fn write_wallets<W: Write>(out: &mut W, wallets: &DelegatedWallets) -> io::Result<()> {
    let wallets = match wallets {
        DelegatedWallets::NotConfigured => {
            return writeln!(out, "Delegated agent payments are not configured");
        }
        DelegatedWallets::Available(wallets) if wallets.is_empty() => {
            return writeln!(out, "No delegated wallets found");
        }
        DelegatedWallets::Available(wallets) => wallets,
    };
    for wallet in wallets {
        writeln!(
            out,
            "{} balance {} {} | remaining limit {} {}",
            wallet.address.shorten(6),
            wallet.balance.major_units(),
            Axis::Native.symbol(),
            wallet.remaining_limit().major_units(),
            Axis::Native.symbol()
        )?;
    }
    Ok(())
}

pub fn write_orders<W: Write>(out: &mut W, orders: &[Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders yet");
    }
    for order in orders {
        let status = if order.fulfilled { "fulfilled" } else { "processing" };
        write!(
            out,
            "Order #{} product #{} paid {} [{}]",
            order.order_id,
            order.product_id,
            format_paid(&order.paid()),
            status
        )?;
        if let Some(agent) = &order.agent_wallet {
            write!(out, " via agent {}", agent.shorten(4))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn format_paid(paid: &PriceTotal) -> String {
    if paid.is_free() {
        String::from("nothing")
    } else {
        format_price(paid)
    }
}
