//! Application layer orchestrating the storefront use cases.
//!
//! `CartStore` owns the persisted cart, `Catalog` and `WalletDirectory` wrap
//! ledger reads with the storefront's degrade-on-failure rules, and
//! `CheckoutService` drives a purchase from precondition checks to settlement.

pub mod cart_store;
pub mod catalog;
pub mod checkout;
pub mod wallets;
