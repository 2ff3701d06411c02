//! Payment records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Money;

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub is_loan_payment: bool,
    pub is_savings_payment: bool,
    pub loan_id: Option<Uuid>,
    pub savings_id: Option<Uuid>,
}

impl Record for Payment {
    const TABLE: &'static str = "payments";
    const ENTITY: &'static str = "Payment";
}

/// Payload for creating a payment. `date` is set by the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub amount: Money,
    pub description: String,
    #[serde(default)]
    pub is_loan_payment: bool,
    #[serde(default)]
    pub is_savings_payment: bool,
    #[serde(default)]
    pub loan_id: Option<Uuid>,
    #[serde(default)]
    pub savings_id: Option<Uuid>,
}

impl NewPayment {
    pub fn new(user_id: Uuid, amount: Money, description: impl Into<String>) -> Self {
        Self {
            user_id,
            amount,
            description: description.into(),
            is_loan_payment: false,
            is_savings_payment: false,
            loan_id: None,
            savings_id: None,
        }
    }

    /// Mark as a repayment of `loan_id`
    pub fn for_loan(mut self, loan_id: Uuid) -> Self {
        self.is_loan_payment = true;
        self.loan_id = Some(loan_id);
        self
    }

    /// Mark as a deposit into `savings_id`
    pub fn for_savings(mut self, savings_id: Uuid) -> Self {
        self.is_savings_payment = true;
        self.savings_id = Some(savings_id);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentChanges {
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PaymentChanges {
    pub fn apply(self, payment: &mut Payment) {
        if let Some(amount) = self.amount {
            payment.amount = amount.value();
        }
        if let Some(description) = self.description {
            payment.description = description;
        }
    }
}
