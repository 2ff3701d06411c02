//! Domain module
//!
//! Money primitives, the lending policy, and domain errors.

pub mod context;
pub mod error;
pub mod money;
pub mod policy;

pub use context::OperationContext;
pub use error::DomainError;
pub use money::{floor_at_zero, round_currency, InterestRate, Money, MoneyError};
pub use policy::{LoanPolicy, DEFAULT_TRUST_SCORE, LOAN_LIMIT, SAVINGS_PERIOD_DAYS};
