use crate::domain::cart::Cart;
use crate::domain::ports::CartRepository;
use crate::error::Result;
use crate::infrastructure::codec::{decode_cart, encode_cart};
use std::sync::{Arc, Mutex, PoisonError};

/// A cart repository that keeps the encoded record in memory.
///
/// Every save and load goes through the same codec as the durable
/// repositories, so it is a faithful stand-in for tests. `Clone` shares the
/// underlying record.
#[derive(Default, Clone)]
pub struct InMemoryCartRepository {
    record: Arc<Mutex<Option<Vec<u8>>>>,
}

impl InMemoryCartRepository {
    /// Creates a new, empty in-memory cart repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with raw record bytes.
    pub fn with_record(bytes: Vec<u8>) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(bytes))),
        }
    }
}

impl CartRepository for InMemoryCartRepository {
    fn load(&self) -> Result<Option<Cart>> {
        let record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        record.as_deref().map(decode_cart).transpose()
    }

    fn save(&self, cart: &Cart) -> Result<()> {
        let bytes = encode_cart(cart)?;
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(bytes);
        Ok(())
    }
}
