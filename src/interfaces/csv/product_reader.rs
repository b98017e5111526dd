use crate::domain::product::Product;
use crate::error::{Result, StoreError};
use std::io::Read;

/// Reads catalog products from a CSV source.
///
/// Expected header: `id,title,description,price_native,price_credit,seller,is_active,stock,image`.
/// Prices are integer minor units. The `image` column may be left out.
pub struct ProductReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ProductReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes one product per record.
    pub fn products(self) -> impl Iterator<Item = Result<Product>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(StoreError::from))
    }
}
