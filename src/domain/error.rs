//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::money::MoneyError;

/// Business rule violations and missing dependencies of derived values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A calculation needed the user's trust score but none is associated
    #[error("No trust score associated with user {user_id}")]
    NoTrustScore { user_id: Uuid },

    /// The user's trust score carries the blacklist flag
    #[error("User {user_id} is blacklisted")]
    Blacklisted { user_id: Uuid },

    /// Requested loan is above the user's maximum loan amount
    #[error("Loan limit exceeded: requested {requested}, maximum {maximum}")]
    LoanLimitExceeded { requested: Decimal, maximum: Decimal },

    /// Repayments are only accepted on active loans
    #[error("Loan is not active: {0}")]
    LoanNotActive(Uuid),

    /// Invalid amount (negative, too precise, or too large)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A date the ledger cannot compute with
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl DomainError {
    pub fn loan_limit_exceeded(requested: Decimal, maximum: Decimal) -> Self {
        Self::LoanLimitExceeded { requested, maximum }
    }
}

impl From<MoneyError> for DomainError {
    fn from(e: MoneyError) -> Self {
        Self::InvalidAmount(e.to_string())
    }
}
