//! Ledger records
//!
//! One struct per persisted entity, the values derived from it, and the
//! invariants enforced on the write path.

pub mod item;
pub mod loan;
pub mod payment;
pub mod savings;
pub mod transaction;
pub mod trust_score;
pub mod user;

pub use item::{Item, ItemChanges, NewItem};
pub use loan::{Loan, LoanChanges, LoanItem, LoanItemChanges, LoanOverview, NewLoan, NewLoanItem};
pub use payment::{NewPayment, Payment, PaymentChanges};
pub use savings::{
    savings_end_date, NewSavings, NewSavingsItem, Savings, SavingsChanges, SavingsItem,
    SavingsItemChanges, SavingsItemOverview, SavingsOverview,
};
pub use transaction::{NewTransaction, Transaction, TransactionChanges, TransactionType};
pub use trust_score::{NewTrustScore, TrustScore, TrustScoreChanges};
pub use user::{NewUser, User, UserChanges, UserProfile};

use chrono::{NaiveDate, Utc};

use crate::domain::DomainError;

/// A record stored in its own table and keyed by a UUID `id` column.
pub trait Record {
    /// Table the record lives in
    const TABLE: &'static str;

    /// Entity name used in errors and logs
    const ENTITY: &'static str;
}

/// A rule that must hold for every row written, on create and on update.
///
/// Repositories call `enforce` immediately before each INSERT and UPDATE,
/// so the stored row always satisfies it regardless of what the caller set.
/// A row the rule cannot be applied to is rejected before it is written.
pub trait SaveInvariant {
    fn enforce(&mut self) -> Result<(), DomainError>;
}

/// Current UTC calendar date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
