pub mod product_reader;
pub mod wallet_reader;
