use crate::error::StoreError;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Decimals used by both currency axes when rendering major units.
pub const DISPLAY_DECIMALS: usize = 18;

/// A non-negative amount in minor units (wei-style), backed by a 256-bit integer.
///
/// Arithmetic saturates at `U256::MAX` rather than wrapping. Serialized as a
/// decimal string so that no JSON or CSV consumer ever sees a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Self = Self(U256([0, 0, 0, 0]));

    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn value(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub fn saturating_mul(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(U256::from(factor)))
    }

    /// Whole major units, rounded half-up.
    pub fn major_units(&self) -> U256 {
        let unit = U256::exp10(DISPLAY_DECIMALS);
        let quotient = self.0 / unit;
        let remainder = self.0 % unit;
        if remainder >= unit / 2 {
            quotient.saturating_add(U256::one())
        } else {
            quotient
        }
    }

    /// Builds an amount from a whole number of major units.
    pub fn from_major(units: u64) -> Self {
        Self(U256::from(units).saturating_mul(U256::exp10(DISPLAY_DECIMALS)))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl FromStr for Amount {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(StoreError::InvalidAmount(s.to_string()));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

/// The two currency axes every price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Native,
    Credit,
}

impl Axis {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Native => "SHM",
            Self::Credit => "USDT",
        }
    }
}

/// An amount on both axes at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceTotal {
    pub native: Amount,
    pub credit: Amount,
}

impl PriceTotal {
    pub const ZERO: Self = Self {
        native: Amount::ZERO,
        credit: Amount::ZERO,
    };

    pub fn new(native: Amount, credit: Amount) -> Self {
        Self { native, credit }
    }

    pub fn is_free(&self) -> bool {
        self.native.is_zero() && self.credit.is_zero()
    }

    pub fn get(&self, axis: Axis) -> Amount {
        match axis {
            Axis::Native => self.native,
            Axis::Credit => self.credit,
        }
    }
}

impl Add for PriceTotal {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            native: self.native + rhs.native,
            credit: self.credit + rhs.credit,
        }
    }
}

impl AddAssign for PriceTotal {
    fn add_assign(&mut self, rhs: Self) {
        self.native += rhs.native;
        self.credit += rhs.credit;
    }
}
