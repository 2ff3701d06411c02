//! Repayment Handler

use sqlx::PgPool;

use crate::domain::OperationContext;
use crate::error::AppError;
use crate::models::{NewPayment, NewTransaction, TransactionType};
use crate::repository;

use super::{parse_positive_amount, RepayLoanCommand, RepaymentResult};

/// Handler for loan repayments
pub struct RepayLoanHandler {
    pool: PgPool,
}

impl RepayLoanHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply a repayment to an active loan and record the payment.
    pub async fn execute(
        &self,
        command: RepayLoanCommand,
        context: &OperationContext,
    ) -> Result<RepaymentResult, AppError> {
        let amount = parse_positive_amount(&command.amount)?;
        let description = command
            .description
            .unwrap_or_else(|| "Loan repayment".to_string());

        let mut tx = self.pool.begin().await?;

        let mut loan = repository::loan::fetch_for_update(&mut *tx, command.loan_id).await?;
        loan.record_repayment(amount)?;
        let loan = repository::loan::save(&mut *tx, &loan).await?;

        let payment = repository::payment::insert(
            &mut *tx,
            &NewPayment::new(loan.user_id, amount, description.clone()).for_loan(loan.id),
        )
        .await?;

        let transaction = repository::transaction::insert(
            &mut *tx,
            &NewTransaction::new(loan.user_id, amount, TransactionType::Payment, description)
                .for_loan(loan.id),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            client_ip = ?context.client_ip,
            loan_id = %loan.id,
            %amount,
            repaid_amount = %loan.repaid_amount,
            "Loan repayment recorded"
        );

        Ok(RepaymentResult {
            total_loan_owed: loan.total_loan_owed(),
            loan,
            payment_id: payment.id,
            transaction_id: transaction.id,
        })
    }
}
