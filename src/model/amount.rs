//! Amount type for handling monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. All amounts are in a single
//! currency and are always displayed with the currency symbol and two decimal places.

use crate::error::{ErrorType, IntoResult};
use anyhow::Context;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// The currency symbol used everywhere an amount is displayed.
pub const CURRENCY: &str = "€";

/// Represents a monetary amount.
///
/// # Examples
///
/// Parsing user input:
/// ```
/// # use budget_sheet::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("42.5").unwrap();
/// assert_eq!(amount.to_string(), "€42.50");
/// ```
///
/// Parsing a cell that uses thousands separators:
/// ```
/// # use budget_sheet::model::Amount;
/// let amount = Amount::from_cell("1,000.00").unwrap();
/// assert_eq!(amount.to_string(), "€1000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Returns `None` if the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Subtracts, clamping to the largest or smallest representable amount on overflow.
    pub fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }

    /// Parses a value read from the sheet for totalling. Unlike `from_str`, thousands separators
    /// are discarded before parsing, so `1,000.00` is accepted.
    pub fn from_cell(s: &str) -> Result<Self, AmountError> {
        Self::from_str(&s.replace(',', ""))
    }

    /// The plain decimal text written into a sheet cell, e.g. `42.50`.
    pub fn to_cell(&self) -> String {
        self.0.to_string()
    }
}

/// Parses an amount typed by the user.
///
/// # Errors
/// - `ErrorType::InvalidAmount` if `input` is not a decimal number.
pub fn parse_amount(input: &str) -> Result<Amount, crate::Error> {
    Amount::from_str(input)
        .with_context(|| format!("Invalid amount '{}'. Please enter a numeric value", input.trim()))
        .pub_result(ErrorType::InvalidAmount)
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount).map_err(AmountError)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if self.is_negative() {
            write!(f, "-{CURRENCY}{:.2}", rounded.abs())
        } else {
            write!(f, "{CURRENCY}{:.2}", rounded.abs())
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_cell())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
