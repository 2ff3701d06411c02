//! Savings Deposit Handler
//!
//! Saving the plan re-applies the end-date rule, so a deposit also pins
//! `end_date` back to `start_date + 90 days`.

use sqlx::PgPool;

use crate::domain::OperationContext;
use crate::error::AppError;
use crate::models::{NewPayment, NewTransaction, TransactionType};
use crate::repository;

use super::{parse_positive_amount, DepositResult, DepositSavingsCommand};

/// Handler for savings deposits
pub struct DepositSavingsHandler {
    pool: PgPool,
}

impl DepositSavingsHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn execute(
        &self,
        command: DepositSavingsCommand,
        context: &OperationContext,
    ) -> Result<DepositResult, AppError> {
        let amount = parse_positive_amount(&command.amount)?;
        let description = command
            .description
            .unwrap_or_else(|| "Savings deposit".to_string());

        let mut tx = self.pool.begin().await?;

        let mut savings = repository::savings::fetch_for_update(&mut *tx, command.savings_id).await?;
        savings.record_deposit(amount)?;
        let savings = repository::savings::save(&mut *tx, savings).await?;

        let payment = repository::payment::insert(
            &mut *tx,
            &NewPayment::new(savings.user_id, amount, description.clone()).for_savings(savings.id),
        )
        .await?;

        let transaction = repository::transaction::insert(
            &mut *tx,
            &NewTransaction::new(savings.user_id, amount, TransactionType::Savings, description)
                .for_savings(savings.id),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            client_ip = ?context.client_ip,
            savings_id = %savings.id,
            %amount,
            amount_saved = %savings.amount_saved,
            "Savings deposit recorded"
        );

        Ok(DepositResult {
            savings,
            payment_id: payment.id,
            transaction_id: transaction.id,
        })
    }
}
