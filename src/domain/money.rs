//! Money and interest rate primitives
//!
//! Currency columns are NUMERIC(10,2) and interest rates NUMERIC(5,2).
//! Both types are validated at construction, so a value that the ledger
//! tables cannot hold never reaches a write.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places kept for currency values
pub const CURRENCY_SCALE: u32 = 2;

/// Largest value a NUMERIC(10,2) column holds
fn max_money() -> Decimal {
    Decimal::new(9_999_999_999, CURRENCY_SCALE)
}

/// Largest value a NUMERIC(5,2) column holds
fn max_rate() -> Decimal {
    Decimal::new(99_999, CURRENCY_SCALE)
}

/// Errors that can occur when creating a Money or InterestRate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Value must not be negative (got {0})")]
    Negative(Decimal),

    #[error("Value has too many decimal places (max 2, got {0})")]
    TooManyDecimals(u32),

    #[error("Value exceeds maximum allowed ({0})")]
    Overflow(Decimal),

    #[error("Invalid decimal format: {0}")]
    ParseError(String),
}

fn validate(value: Decimal, max: Decimal) -> Result<Decimal, MoneyError> {
    if value < Decimal::ZERO {
        return Err(MoneyError::Negative(value));
    }

    let scale = value.normalize().scale();
    if scale > CURRENCY_SCALE {
        return Err(MoneyError::TooManyDecimals(scale));
    }

    if value > max {
        return Err(MoneyError::Overflow(max));
    }

    Ok(value)
}

/// Round a currency value to cents, ties to even.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Clamp a derived amount at zero.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// A non-negative currency amount with at most two decimal places.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use mamapesa::domain::Money;
///
/// let fee = Money::new(Decimal::new(25050, 2)).unwrap();
/// assert_eq!(fee.to_string(), "250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Create a Money value.
    ///
    /// # Errors
    /// - `MoneyError::Negative` if value < 0
    /// - `MoneyError::TooManyDecimals` if more than 2 decimal places
    /// - `MoneyError::Overflow` if value > 99,999,999.99
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        validate(value, max_money()).map(Self)
    }

    pub fn from_integer(value: i64) -> Result<Self, MoneyError> {
        Self::new(Decimal::from(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Add two amounts, failing if the sum no longer fits the column.
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        Money::new(self.0 + other.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|e| MoneyError::ParseError(e.to_string()))?;
        Money::new(decimal)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// Annual interest rate in percent, e.g. `10.50` for 10.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct InterestRate(Decimal);

impl InterestRate {
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        validate(value, max_rate()).map(Self)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for InterestRate {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        InterestRate::new(value)
    }
}

impl From<InterestRate> for Decimal {
    fn from(rate: InterestRate) -> Self {
        rate.0
    }
}
