//! Adapters for the domain ports: cart persistence backends and an
//! in-process ledger.

pub mod codec;
pub mod in_memory;
pub mod json_file;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod simulated_ledger;
