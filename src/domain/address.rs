use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte ledger account address, kept as lowercase `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub const ZERO: &'static str = "0x0000000000000000000000000000000000000000";

    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let raw = raw.trim();
        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| StoreError::InvalidAddress(raw.to_string()))?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StoreError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders `0x1234...abcd`, keeping `chars` hex digits on each side.
    pub fn shorten(&self, chars: usize) -> String {
        let chars = chars.min(20);
        format!("{}...{}", &self.0[..chars + 2], &self.0[42 - chars..])
    }
}

impl FromStr for Address {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let address = Address::parse("0x7912D2524bA63611430cf5461Fab62Fe56C3265E").unwrap();
        assert_eq!(
            address.as_str(),
            "0x7912d2524ba63611430cf5461fab62fe56c3265e"
        );
        assert_eq!(
            address,
            "0x7912d2524ba63611430cf5461fab62fe56c3265e".parse().unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("7912d2524ba63611430cf5461fab62fe56c3265e").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xzz12d2524ba63611430cf5461fab62fe56c3265e").is_err());
    }

    #[test]
    fn test_shorten() {
        let address = Address::parse("0x7912d2524ba63611430cf5461fab62fe56c3265e").unwrap();
        assert_eq!(address.shorten(4), "0x7912...265e");
    }
}
