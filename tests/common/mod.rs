#![allow(dead_code)]

use assert_cmd::cargo_bin;
use std::fs::File;
use std::io::Error;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const OWNER: &str = "0x00000000000000000000000000000000000000b0";
pub const AGENT_WALLET: &str = "0x00000000000000000000000000000000000000a1";
pub const FACTORY: &str = "0x00000000000000000000000000000000000000f0";
pub const SELLER: &str = "0x00000000000000000000000000000000000000aa";

/// One whole unit on either axis, in minor units.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// `(id, title, native major units, credit major units, stock, active)`
pub type Row<'a> = (u64, &'a str, u64, u64, u64, bool);

pub fn write_catalog(path: &Path, rows: &[Row<'_>]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record([
        "id",
        "title",
        "description",
        "price_native",
        "price_credit",
        "seller",
        "is_active",
        "stock",
        "image",
    ])?;
    for (id, title, native, credit, stock, active) in rows {
        wtr.write_record([
            id.to_string(),
            title.to_string(),
            format!("{title} description"),
            (u128::from(*native) * UNIT).to_string(),
            (u128::from(*credit) * UNIT).to_string(),
            SELLER.to_string(),
            active.to_string(),
            stock.to_string(),
            String::new(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `(owner, address, balance, spending_cap, credit_used)` in major units.
pub fn write_wallets(path: &Path, rows: &[(&str, &str, u64, u64, u64)]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["owner", "address", "balance", "spending_cap", "credit_used"])?;
    for (owner, address, balance, cap, used) in rows {
        wtr.write_record([
            owner.to_string(),
            address.to_string(),
            (u128::from(*balance) * UNIT).to_string(),
            (u128::from(*cap) * UNIT).to_string(),
            (u128::from(*used) * UNIT).to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// A scratch storefront: catalog and wallet fixtures plus a cart file, all in
/// one temporary directory.
pub struct Storefront {
    pub dir: tempfile::TempDir,
}

impl Storefront {
    pub fn new(catalog: &[Row<'_>]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(&dir.path().join("catalog.csv"), catalog).unwrap();
        write_wallets(&dir.path().join("wallets.csv"), &[]).unwrap();
        Self { dir }
    }

    pub fn with_wallets(self, rows: &[(&str, &str, u64, u64, u64)]) -> Self {
        write_wallets(&self.dir.path().join("wallets.csv"), rows).unwrap();
        self
    }

    pub fn cart_path(&self) -> PathBuf {
        self.dir.path().join("cart.json")
    }

    /// The binary with fixtures wired in and a deterministic environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(cargo_bin!("shopfront"));
        cmd.current_dir(self.dir.path())
            .env("REDIRECT_DELAY_MS", "0")
            .env("RECEIPT_POLL_INTERVAL_MS", "1")
            .env_remove("AGENT_WALLET_ADDRESS")
            .env_remove("AGENT_WALLET_FACTORY_ADDRESS")
            .env_remove("STORE_CONTRACT_ADDRESS")
            .env_remove("CART_STORAGE_PATH")
            .env_remove("RUST_LOG")
            .arg("--catalog")
            .arg(self.dir.path().join("catalog.csv"))
            .arg("--wallets")
            .arg(self.dir.path().join("wallets.csv"))
            .arg("--cart-path")
            .arg(self.cart_path());
        cmd
    }
}
