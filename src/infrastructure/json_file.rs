use crate::domain::cart::Cart;
use crate::domain::ports::CartRepository;
use crate::error::Result;
use crate::infrastructure::codec::{decode_cart, encode_cart};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Persists the cart record as a JSON file.
///
/// Writes go to a temporary file in the same directory which then replaces
/// the record, so a reader never observes a half-written cart.
#[derive(Debug, Clone)]
pub struct JsonFileCartRepository {
    path: PathBuf,
}

impl JsonFileCartRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CartRepository for JsonFileCartRepository {
    fn load(&self) -> Result<Option<Cart>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => decode_cart(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, cart: &Cart) -> Result<()> {
        let bytes = encode_cart(cart)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
