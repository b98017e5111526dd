//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STORE_CONTRACT_ADDRESS` - store contract (default: the public testnet deployment)
//! - `PAYMENT_TOKEN_ADDRESS` - credit token contract
//! - `AGENT_WALLET_ADDRESS` - delegated wallet preselected at checkout
//! - `AGENT_WALLET_FACTORY_ADDRESS` - delegated wallet factory; without it the
//!   agent payment method reports "not configured"
//! - `CHAIN_ID` - network id (default: 8119)
//! - `RPC_URL` - ledger endpoint
//! - `REDIRECT_DELAY_MS` - delay before leaving the checkout after success (default: 3000)
//! - `RECEIPT_POLL_INTERVAL_MS` - settlement polling interval (default: 1000)
//! - `CART_STORAGE_PATH` - JSON cart file (default: cart-storage.json)

use crate::domain::address::Address;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_STORE_ADDRESS: &str = "0x7912D2524bA63611430cf5461Fab62Fe56C3265E";
pub const DEFAULT_CHAIN_ID: u64 = 8119;
pub const DEFAULT_RPC_URL: &str = "https://api-mezame.shardeum.org";
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 3000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_CART_STORAGE_PATH: &str = "cart-storage.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Ledger contract addresses. Only the store is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAddresses {
    pub store: Address,
    pub payment_token: Option<Address>,
    pub delegated_wallet: Option<Address>,
    pub delegated_wallet_factory: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub contracts: ContractAddresses,
    pub network: NetworkConfig,
    pub redirect_delay: Duration,
    pub receipt_poll_interval: Duration,
    pub cart_storage_path: PathBuf,
}

impl StoreConfig {
    /// Load configuration from the process environment, honouring a `.env`
    /// file when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = parse_address("STORE_CONTRACT_ADDRESS", get("STORE_CONTRACT_ADDRESS"))?
            .map_or_else(|| parse_default_address(DEFAULT_STORE_ADDRESS), Ok)?;

        let contracts = ContractAddresses {
            store,
            payment_token: parse_address("PAYMENT_TOKEN_ADDRESS", get("PAYMENT_TOKEN_ADDRESS"))?,
            delegated_wallet: parse_address("AGENT_WALLET_ADDRESS", get("AGENT_WALLET_ADDRESS"))?,
            delegated_wallet_factory: parse_address(
                "AGENT_WALLET_FACTORY_ADDRESS",
                get("AGENT_WALLET_FACTORY_ADDRESS"),
            )?,
        };

        let network = NetworkConfig {
            chain_id: parse_u64("CHAIN_ID", get("CHAIN_ID"), DEFAULT_CHAIN_ID)?,
            rpc_url: get("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
        };

        Ok(Self {
            contracts,
            network,
            redirect_delay: Duration::from_millis(parse_u64(
                "REDIRECT_DELAY_MS",
                get("REDIRECT_DELAY_MS"),
                DEFAULT_REDIRECT_DELAY_MS,
            )?),
            receipt_poll_interval: Duration::from_millis(parse_u64(
                "RECEIPT_POLL_INTERVAL_MS",
                get("RECEIPT_POLL_INTERVAL_MS"),
                DEFAULT_POLL_INTERVAL_MS,
            )?),
            cart_storage_path: get("CART_STORAGE_PATH")
                .unwrap_or_else(|| DEFAULT_CART_STORAGE_PATH.to_string())
                .into(),
        })
    }

    /// The delegated agent method needs the wallet factory to discover wallets.
    pub fn delegated_wallets_configured(&self) -> bool {
        self.contracts.delegated_wallet_factory.is_some()
    }
}

fn parse_address(key: &str, value: Option<String>) -> Result<Option<Address>, ConfigError> {
    value
        .map(|v| {
            Address::parse(&v)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

fn parse_default_address(value: &str) -> Result<Address, ConfigError> {
    Address::parse(value).map_err(|e| {
        ConfigError::InvalidEnvVar("STORE_CONTRACT_ADDRESS".to_string(), e.to_string())
    })
}

fn parse_u64(key: &str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
