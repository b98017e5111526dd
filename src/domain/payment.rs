use super::address::Address;
use super::amount::Amount;
use super::cart::Cart;
use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[serde(rename = "wallet")]
    DirectWallet,
    #[serde(rename = "agent")]
    DelegatedAgent,
    PayFi,
    CredFi,
}

impl PaymentMethod {
    pub const ALL: [Self; 4] = [
        Self::DirectWallet,
        Self::DelegatedAgent,
        Self::PayFi,
        Self::CredFi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectWallet => "wallet",
            Self::DelegatedAgent => "agent",
            Self::PayFi => "payfi",
            Self::CredFi => "credfi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DirectWallet => "Pay with Your Wallet",
            Self::DelegatedAgent => "Request Agent to Pay",
            Self::PayFi => "Pay using PayFi",
            Self::CredFi => "Pay using CREDFI",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::DirectWallet => "Use your connected wallet to pay",
            Self::DelegatedAgent => "Let a delegated agent wallet handle payment",
            Self::PayFi => "Instant payment directly to the store wallet",
            Self::CredFi => "Crypto credit payment with instant approval",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::DirectWallet => "Pay Now",
            Self::DelegatedAgent => "Request Agent Payment",
            Self::PayFi => "Pay using PayFi",
            Self::CredFi => "Pay using CREDFI",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown payment method '{s}' (expected wallet, agent, payfi or credfi)")
            })
    }
}

/// Ledger entry points the storefront calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryPoint {
    #[serde(rename = "purchase")]
    Purchase,
    #[serde(rename = "requestPaymentFromWallet")]
    RequestPaymentFromWallet,
}

impl EntryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::RequestPaymentFromWallet => "requestPaymentFromWallet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallArg {
    ProductId(u64),
    Address(Address),
}

/// A fully specified outbound ledger call, built before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    pub target: Address,
    pub entry_point: EntryPoint,
    pub args: Vec<CallArg>,
    pub value: Option<Amount>,
}

impl CallDescriptor {
    pub fn product_id(&self) -> Option<u64> {
        self.args.iter().find_map(|arg| match arg {
            CallArg::ProductId(id) => Some(*id),
            CallArg::Address(_) => None,
        })
    }

    pub fn address_arg(&self) -> Option<&Address> {
        self.args.iter().find_map(|arg| match arg {
            CallArg::Address(address) => Some(address),
            CallArg::ProductId(_) => None,
        })
    }
}

/// Maps a payment method and cart to exactly one call against the store
/// contract. It never dispatches anything itself.
#[derive(Debug, Clone)]
pub struct PaymentRouter {
    store: Address,
}

impl PaymentRouter {
    pub fn new(store: Address) -> Self {
        Self { store }
    }

    /// Only the first cart line is submitted; multi-line settlement is not
    /// supported by the store contract call used here.
    pub fn route(
        &self,
        method: PaymentMethod,
        cart: &Cart,
        buyer: &Address,
        delegated_wallet: Option<&Address>,
    ) -> Result<CallDescriptor> {
        let line = cart.first_line().ok_or(StoreError::EmptyCart)?;
        let product_id = line.product.id;

        let descriptor = match method {
            PaymentMethod::DirectWallet => {
                self.purchase(product_id, buyer, line.product.price_native)
            }
            PaymentMethod::PayFi | PaymentMethod::CredFi => {
                self.purchase(product_id, buyer, cart.total().native)
            }
            PaymentMethod::DelegatedAgent => {
                let wallet = delegated_wallet.ok_or(StoreError::NoDelegatedWalletSelected)?;
                CallDescriptor {
                    target: self.store.clone(),
                    entry_point: EntryPoint::RequestPaymentFromWallet,
                    args: vec![CallArg::ProductId(product_id), CallArg::Address(wallet.clone())],
                    value: None,
                }
            }
        };
        Ok(descriptor)
    }

    fn purchase(&self, product_id: u64, buyer: &Address, value: Amount) -> CallDescriptor {
        CallDescriptor {
            target: self.store.clone(),
            entry_point: EntryPoint::Purchase,
            args: vec![CallArg::ProductId(product_id), CallArg::Address(buyer.clone())],
            value: Some(value),
        }
    }
}
