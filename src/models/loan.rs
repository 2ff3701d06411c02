//! Loans and the items they finance

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{round_currency, DomainError, InterestRate, LoanPolicy, Money};

use super::{Item, Record};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Loan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    /// Percent, e.g. 10.00
    pub interest_rate: Decimal,
    pub duration_months: i16,
    pub application_date: NaiveDate,
    pub repaid_amount: Decimal,
    pub total_paid: Decimal,
    pub is_approved: bool,
    pub is_active: bool,
    pub disbursed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Loan {
    const TABLE: &'static str = "loans";
    const ENTITY: &'static str = "Loan";
}

impl Loan {
    /// `amount + amount * interest_rate / 100`, rounded to cents (ties to even).
    pub fn total_loan_owed(&self) -> Decimal {
        round_currency(self.amount + self.amount * self.interest_rate / Decimal::ONE_HUNDRED)
    }

    /// `max(0, amount - repaid_amount - loan_limit)`
    pub fn remaining_loan_amount(&self, policy: &LoanPolicy) -> Decimal {
        policy.remaining_after_limit(self.amount, self.repaid_amount)
    }

    /// True when every loaned item is in stock; true for a loan with none.
    pub fn is_item_available(loaned_items: &[Item]) -> bool {
        loaned_items.iter().all(|item| item.in_stock)
    }

    /// Add a repayment to `repaid_amount` and `total_paid`.
    pub fn record_repayment(&mut self, amount: Money) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::LoanNotActive(self.id));
        }
        self.repaid_amount = Money::new(self.repaid_amount)?.checked_add(&amount)?.value();
        self.total_paid = Money::new(self.total_paid)?.checked_add(&amount)?.value();
        Ok(())
    }

    pub fn describe(&self, username: &str) -> String {
        format!("{}'s Loan {}", username, self.id)
    }
}

/// Payload for creating a loan. Flags and paid amounts take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoan {
    pub user_id: Uuid,
    pub amount: Money,
    pub interest_rate: InterestRate,
    pub duration_months: i16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanChanges {
    #[serde(default)]
    pub interest_rate: Option<InterestRate>,
    #[serde(default)]
    pub duration_months: Option<i16>,
    #[serde(default)]
    pub repaid_amount: Option<Money>,
    #[serde(default)]
    pub total_paid: Option<Money>,
    #[serde(default)]
    pub is_approved: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub disbursed: Option<bool>,
}

impl LoanChanges {
    pub fn apply(self, loan: &mut Loan) {
        if let Some(rate) = self.interest_rate {
            loan.interest_rate = rate.value();
        }
        if let Some(duration_months) = self.duration_months {
            loan.duration_months = duration_months;
        }
        if let Some(repaid) = self.repaid_amount {
            loan.repaid_amount = repaid.value();
        }
        if let Some(total_paid) = self.total_paid {
            loan.total_paid = total_paid.value();
        }
        if let Some(is_approved) = self.is_approved {
            loan.is_approved = is_approved;
        }
        if let Some(is_active) = self.is_active {
            loan.is_active = is_active;
        }
        if let Some(disbursed) = self.disbursed {
            loan.disbursed = disbursed;
        }
    }
}

/// Derived values of a loan, as reported by the data API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanOverview {
    pub loan_id: Uuid,
    pub total_loan_owed: Decimal,
    pub remaining_loan_amount: Decimal,
    pub is_item_available: bool,
    pub loaned_item_ids: Vec<Uuid>,
}

impl LoanOverview {
    pub fn new(loan: &Loan, loaned_items: &[Item], policy: &LoanPolicy) -> Self {
        Self {
            loan_id: loan.id,
            total_loan_owed: loan.total_loan_owed(),
            remaining_loan_amount: loan.remaining_loan_amount(policy),
            is_item_available: Loan::is_item_available(loaned_items),
            loaned_item_ids: loaned_items.iter().map(|item| item.id).collect(),
        }
    }
}

// =========================================================================
// Loan items
// =========================================================================

/// A physical item financed by a loan, with what has been paid toward it.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct LoanItem {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub item_id: Uuid,
    pub amount_paid: Decimal,
}

impl Record for LoanItem {
    const TABLE: &'static str = "loan_items";
    const ENTITY: &'static str = "LoanItem";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoanItem {
    pub loan_id: Uuid,
    pub item_id: Uuid,
    #[serde(default = "Money::zero")]
    pub amount_paid: Money,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanItemChanges {
    #[serde(default)]
    pub amount_paid: Option<Money>,
}

impl LoanItemChanges {
    pub fn apply(self, loan_item: &mut LoanItem) {
        if let Some(amount_paid) = self.amount_paid {
            loan_item.amount_paid = amount_paid.value();
        }
    }
}
