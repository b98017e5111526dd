pub mod address;
pub mod amount;
pub mod cart;
pub mod lifecycle;
pub mod order;
pub mod payment;
pub mod ports;
pub mod pricing;
pub mod product;
pub mod wallet;
