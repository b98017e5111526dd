//! Adapters between the storefront and the outside world: CSV fixtures that
//! seed the ledger, and the console that renders state and follows navigation.

pub mod console;
pub mod csv;
