//! Transaction records
//!
//! The audit trail of money movements. The type column is stored as text
//! and decoded into `TransactionType` when read.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::Money;

use super::Record;

/// Transaction types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Payment,
    Loan,
    Savings,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Payment => "payment",
            TransactionType::Loan => "loan",
            TransactionType::Savings => "savings",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Payment => "Payment",
            TransactionType::Loan => "Loan",
            TransactionType::Savings => "Savings",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown transaction type: {0}")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(TransactionType::Payment),
            "loan" => Ok(TransactionType::Loan),
            "savings" => Ok(TransactionType::Savings),
            other => Err(UnknownTransactionType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub transaction_type: TransactionType,
    pub timestamp: DateTime<Utc>,
    pub loan_id: Option<Uuid>,
    pub savings_id: Option<Uuid>,
}

impl Transaction {
    pub fn describe(&self, username: &str) -> String {
        format!(
            "{}'s {} Transaction ({})",
            username,
            self.transaction_type.label(),
            self.description
        )
    }
}

/// Row as stored, before the type column is decoded
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub transaction_type: String,
    pub timestamp: DateTime<Utc>,
    pub loan_id: Option<Uuid>,
    pub savings_id: Option<Uuid>,
}

impl Record for TransactionRow {
    const TABLE: &'static str = "transactions";
    const ENTITY: &'static str = "Transaction";
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = UnknownTransactionType;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            description: row.description,
            transaction_type: row.transaction_type.parse()?,
            timestamp: row.timestamp,
            loan_id: row.loan_id,
            savings_id: row.savings_id,
        })
    }
}

/// Payload for creating a transaction. `timestamp` is set by the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub amount: Money,
    pub description: String,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub loan_id: Option<Uuid>,
    #[serde(default)]
    pub savings_id: Option<Uuid>,
}

impl NewTransaction {
    pub fn new(
        user_id: Uuid,
        amount: Money,
        transaction_type: TransactionType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            amount,
            description: description.into(),
            transaction_type,
            loan_id: None,
            savings_id: None,
        }
    }

    pub fn for_loan(mut self, loan_id: Uuid) -> Self {
        self.loan_id = Some(loan_id);
        self
    }

    pub fn for_savings(mut self, savings_id: Uuid) -> Self {
        self.savings_id = Some(savings_id);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionChanges {
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<TransactionType>,
}

impl TransactionChanges {
    pub fn apply(self, transaction: &mut Transaction) {
        if let Some(amount) = self.amount {
            transaction.amount = amount.value();
        }
        if let Some(description) = self.description {
            transaction.description = description;
        }
        if let Some(transaction_type) = self.transaction_type {
            transaction.transaction_type = transaction_type;
        }
    }
}
