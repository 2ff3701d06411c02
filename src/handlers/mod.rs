//! Command Handlers module
//!
//! Handlers for the operations that move money. Each one runs inside a
//! single database transaction: every row it writes commits together or
//! not at all.

mod commands;
mod loan_handler;
mod repayment_handler;
mod savings_handler;

#[cfg(test)]
mod tests;

pub use commands::*;
pub use loan_handler::ApplyForLoanHandler;
pub use repayment_handler::RepayLoanHandler;
pub use savings_handler::DepositSavingsHandler;

use rust_decimal::Decimal;

use crate::domain::{DomainError, InterestRate, Money};

/// Parse an amount that must be strictly positive.
pub(crate) fn parse_positive_amount(raw: &str) -> Result<Money, DomainError> {
    let amount: Money = raw.trim().parse()?;
    if amount.is_zero() {
        return Err(DomainError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

pub(crate) fn parse_interest_rate(raw: &str) -> Result<InterestRate, DomainError> {
    let value: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidAmount(format!("invalid interest rate: {}", raw)))?;
    Ok(InterestRate::new(value)?)
}
