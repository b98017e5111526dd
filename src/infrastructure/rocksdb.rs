use crate::domain::cart::Cart;
use crate::domain::ports::CartRepository;
use crate::error::Result;
use crate::infrastructure::codec::{CART_RECORD_NAME, decode_cart, encode_cart};
use rocksdb::{DB, Options};
use std::path::Path;
use std::sync::Arc;

/// A persistent cart repository using RocksDB.
///
/// The whole cart lives under a single key, so every save is one atomic put.
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbCartRepository {
    db: Arc<DB>,
}

impl RocksDbCartRepository {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path)?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl CartRepository for RocksDbCartRepository {
    fn load(&self) -> Result<Option<Cart>> {
        self.db
            .get(CART_RECORD_NAME)?
            .map(|bytes| decode_cart(&bytes))
            .transpose()
    }

    fn save(&self, cart: &Cart) -> Result<()> {
        let value = encode_cart(cart)?;
        self.db.put(CART_RECORD_NAME, value)?;
        Ok(())
    }
}
