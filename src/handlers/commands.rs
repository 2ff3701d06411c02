//! Command definitions
//!
//! Commands represent intentions to move money through the ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Loan, Savings};

// =========================================================================
// ApplyForLoanCommand
// =========================================================================

/// Command to apply for a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyForLoanCommand {
    pub user_id: Uuid,
    /// Principal (as string for precise decimal)
    pub amount: String,
    /// Interest rate in percent (as string for precise decimal)
    pub interest_rate: String,
    pub duration_months: i16,
    /// Items the loan is taken out for
    #[serde(default)]
    pub item_ids: Vec<Uuid>,
}

impl ApplyForLoanCommand {
    pub fn new(user_id: Uuid, amount: String, interest_rate: String, duration_months: i16) -> Self {
        Self {
            user_id,
            amount,
            interest_rate,
            duration_months,
            item_ids: Vec::new(),
        }
    }

    pub fn with_items(mut self, item_ids: Vec<Uuid>) -> Self {
        self.item_ids = item_ids;
        self
    }
}

// =========================================================================
// RepayLoanCommand
// =========================================================================

/// Command to repay part of a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepayLoanCommand {
    pub loan_id: Uuid,
    pub amount: String,
    pub description: Option<String>,
}

impl RepayLoanCommand {
    pub fn new(loan_id: Uuid, amount: String) -> Self {
        Self {
            loan_id,
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

// =========================================================================
// DepositSavingsCommand
// =========================================================================

/// Command to deposit into a savings plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositSavingsCommand {
    pub savings_id: Uuid,
    pub amount: String,
    pub description: Option<String>,
}

impl DepositSavingsCommand {
    pub fn new(savings_id: Uuid, amount: String) -> Self {
        Self {
            savings_id,
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

/// Result of an accepted loan application
#[derive(Debug, Clone, Serialize)]
pub struct LoanApplicationResult {
    pub loan: Loan,
    pub max_loan_amount: Decimal,
    pub loan_count: i32,
    pub transaction_id: Uuid,
}

/// Result of a recorded repayment
#[derive(Debug, Clone, Serialize)]
pub struct RepaymentResult {
    pub loan: Loan,
    pub payment_id: Uuid,
    pub transaction_id: Uuid,
    pub total_loan_owed: Decimal,
}

/// Result of a recorded deposit
#[derive(Debug, Clone, Serialize)]
pub struct DepositResult {
    pub savings: Savings,
    pub payment_id: Uuid,
    pub transaction_id: Uuid,
}
