//! Loan Application Handler
//!
//! Checks an application against the applicant's trust score and records
//! the loan, its item links, the loan count and the ledger transaction.

use sqlx::PgPool;

use crate::domain::{LoanPolicy, OperationContext};
use crate::error::AppError;
use crate::models::{NewLoan, NewTransaction, TransactionType, UserProfile};
use crate::repository;

use super::{parse_interest_rate, parse_positive_amount, ApplyForLoanCommand, LoanApplicationResult};

/// Handler for loan applications
pub struct ApplyForLoanHandler {
    pool: PgPool,
    policy: LoanPolicy,
}

impl ApplyForLoanHandler {
    pub fn new(pool: PgPool, policy: LoanPolicy) -> Self {
        Self { pool, policy }
    }

    /// Execute the loan application
    pub async fn execute(
        &self,
        command: ApplyForLoanCommand,
        context: &OperationContext,
    ) -> Result<LoanApplicationResult, AppError> {
        let amount = parse_positive_amount(&command.amount)?;
        let interest_rate = parse_interest_rate(&command.interest_rate)?;
        if command.duration_months <= 0 {
            return Err(AppError::InvalidRequest(
                "duration_months must be positive".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let user = repository::user::fetch(&mut *tx, command.user_id).await?;
        let trust_score = repository::trust_score::find_for_user(&mut *tx, command.user_id).await?;
        let profile = UserProfile::new(user, trust_score);

        let max_loan_amount = match profile.check_loan_application(&self.policy, amount) {
            Ok(maximum) => maximum,
            Err(e) => {
                tracing::warn!(
                    correlation_id = ?context.correlation_id,
                    client_ip = ?context.client_ip,
                    user_id = %command.user_id,
                    requested = %amount,
                    error = %e,
                    "Loan application rejected"
                );
                return Err(e.into());
            }
        };

        let new_loan = NewLoan {
            user_id: command.user_id,
            amount,
            interest_rate,
            duration_months: command.duration_months,
        };
        let loan = repository::loan::insert(&mut *tx, &new_loan).await?;

        for item_id in &command.item_ids {
            repository::loan::link_item(&mut *tx, loan.id, *item_id).await?;
        }

        let loan_count = repository::user::increment_loan_count(&mut *tx, command.user_id).await?;

        let transaction = repository::transaction::insert(
            &mut *tx,
            &NewTransaction::new(command.user_id, amount, TransactionType::Loan, "Loan application")
                .for_loan(loan.id),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            client_ip = ?context.client_ip,
            loan_id = %loan.id,
            user_id = %loan.user_id,
            amount = %loan.amount,
            %max_loan_amount,
            loan_count,
            "Loan application accepted"
        );

        Ok(LoanApplicationResult {
            loan,
            max_loan_amount,
            loan_count,
            transaction_id: transaction.id,
        })
    }
}
