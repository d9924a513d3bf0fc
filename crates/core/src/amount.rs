//! Amount - Non-negative decimal wrapper for wallet funds
//!
//! Pool balances, deposits and transfer amounts are never negative.
//! The invariant lives in the type, so nothing downstream re-checks it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when building an amount
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be negative: {0}")]
    Negative(Decimal),

    #[error("Amount must be positive: {0}")]
    NotPositive(Decimal),

    #[error("Invalid amount: {0}")]
    Parse(String),
}

/// A non-negative decimal amount.
///
/// # Example
/// ```
/// use multisig_core::Amount;
/// use rust_decimal::Decimal;
///
/// let amount = Amount::new(Decimal::new(100, 0)).unwrap();
/// assert_eq!(amount.value(), Decimal::new(100, 0));
///
/// assert!(Amount::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new Amount, rejecting negative values.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            Err(AmountError::Negative(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Whole-unit amount, the common case in tests and seeding.
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns None on decimal overflow
    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Returns None if the result would be negative
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        let result = self.0.checked_sub(other.0)?;
        if result < Decimal::ZERO {
            None
        } else {
            Some(Amount(result))
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| AmountError::Parse(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A strictly positive amount, as required for a transfer request.
///
/// ```
/// use multisig_core::{Amount, PositiveAmount};
///
/// assert!(PositiveAmount::new(Amount::from_units(5)).is_ok());
/// assert!(PositiveAmount::new(Amount::ZERO).is_err());
/// assert!("0".parse::<PositiveAmount>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositiveAmount(Amount);

impl PositiveAmount {
    pub fn new(amount: Amount) -> Result<Self, AmountError> {
        if amount.is_zero() {
            Err(AmountError::NotPositive(amount.value()))
        } else {
            Ok(Self(amount))
        }
    }

    #[inline]
    pub const fn amount(&self) -> Amount {
        self.0
    }
}

impl fmt::Display for PositiveAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PositiveAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse()?)
    }
}

impl TryFrom<Amount> for PositiveAmount {
    type Error = AmountError;

    fn try_from(amount: Amount) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<PositiveAmount> for Amount {
    fn from(amount: PositiveAmount) -> Self {
        amount.0
    }
}
