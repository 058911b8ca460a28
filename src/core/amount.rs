//! Currency amounts
//!
//! An [`Amount`] counts factoshis, the smallest unit (10^-8 of a factoid).
//! Arithmetic is checked: overflow and underflow are reported, never wrapped.

use crate::error::{Result, WalletError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of factoshis in one factoid
pub const FACTOSHIS_PER_FACTOID: u64 = 100_000_000;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(factoshis: u64) -> Amount {
        Amount(factoshis)
    }

    pub const fn factoshis(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Amount) -> Result<Amount> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(WalletError::AmountOverflow)
    }

    /// `None` when the result would be negative
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn checked_mul(self, factor: u64) -> Result<Amount> {
        self.0
            .checked_mul(factor)
            .map(Amount)
            .ok_or(WalletError::AmountOverflow)
    }

    /// Sum a sequence of amounts, failing on overflow
    pub fn sum<I>(amounts: I) -> Result<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Format as whole factoids with eight decimals, e.g. `1.50000000`
    pub fn to_decimal_string(self) -> String {
        format!(
            "{}.{:08}",
            self.0 / FACTOSHIS_PER_FACTOID,
            self.0 % FACTOSHIS_PER_FACTOID
        )
    }
}

impl From<u64> for Amount {
    fn from(factoshis: u64) -> Self {
        Amount(factoshis)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses signed decimal text so negative values are rejected explicitly
/// instead of failing as "not a number" or wrapping.
impl FromStr for Amount {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let value: i128 = text
            .parse()
            .map_err(|e| WalletError::InvalidAmount(format!("{text:?} is not an integer: {e}")))?;
        if value < 0 {
            return Err(WalletError::InvalidAmount(format!(
                "{text} may not be less than 0"
            )));
        }
        u64::try_from(value)
            .map(Amount)
            .map_err(|_| WalletError::InvalidAmount(format!("{text} exceeds the maximum amount")))
    }
}
