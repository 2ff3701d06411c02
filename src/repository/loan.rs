//! Loan Repository
//!
//! Loans, the items they finance (`loan_items`) and the plain item links
//! kept in `loan_loaned_items`.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Loan, LoanItem, NewLoan, NewLoanItem};

use super::{delete_by_id, fetch_by_id, RepositoryError, RepositoryResult};

pub(crate) async fn insert<'e, E: PgExecutor<'e>>(executor: E, new_loan: &NewLoan) -> RepositoryResult<Loan> {
    let loan = sqlx::query_as::<_, Loan>(
        r#"
        INSERT INTO loans (id, user_id, amount, interest_rate, duration_months)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_loan.user_id)
    .bind(new_loan.amount.value())
    .bind(new_loan.interest_rate.value())
    .bind(new_loan.duration_months)
    .fetch_one(executor)
    .await?;

    Ok(loan)
}

/// Load a loan and lock its row until the surrounding transaction ends.
pub(crate) async fn fetch_for_update<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> RepositoryResult<Loan> {
    sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Loan", id))
}

pub(crate) async fn save<'e, E: PgExecutor<'e>>(executor: E, loan: &Loan) -> RepositoryResult<Loan> {
    sqlx::query_as::<_, Loan>(
        r#"
        UPDATE loans
        SET interest_rate = $2,
            duration_months = $3,
            repaid_amount = $4,
            total_paid = $5,
            is_approved = $6,
            is_active = $7,
            disbursed = $8,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(loan.id)
    .bind(loan.interest_rate)
    .bind(loan.duration_months)
    .bind(loan.repaid_amount)
    .bind(loan.total_paid)
    .bind(loan.is_approved)
    .bind(loan.is_active)
    .bind(loan.disbursed)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepositoryError::not_found("Loan", loan.id))
}

/// Link an item to a loan. Linking the same pair twice is a no-op.
pub(crate) async fn link_item<'e, E: PgExecutor<'e>>(
    executor: E,
    loan_id: Uuid,
    item_id: Uuid,
) -> RepositoryResult<()> {
    sqlx::query(
        r#"
        INSERT INTO loan_loaned_items (loan_id, item_id)
        VALUES ($1, $2)
        ON CONFLICT (loan_id, item_id) DO NOTHING
        "#,
    )
    .bind(loan_id)
    .bind(item_id)
    .execute(executor)
    .await?;

    Ok(())
}

/// Repository for loans
#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a loan with default flags and zero paid amounts. Limit checks
    /// belong to `ApplyForLoanHandler`; this is the raw insert.
    pub async fn create(&self, new_loan: &NewLoan) -> RepositoryResult<Loan> {
        let loan = insert(&self.pool, new_loan).await?;
        tracing::info!(loan_id = %loan.id, user_id = %loan.user_id, amount = %loan.amount, "Loan created");
        Ok(loan)
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Loan> {
        fetch_by_id(&self.pool, id).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE user_id = $1 ORDER BY application_date DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    pub async fn update(&self, loan: &Loan) -> RepositoryResult<Loan> {
        save(&self.pool, loan).await
    }

    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<Loan, _>(&self.pool, id).await
    }

    pub async fn link_item(&self, loan_id: Uuid, item_id: Uuid) -> RepositoryResult<()> {
        link_item(&self.pool, loan_id, item_id).await
    }

    /// Returns whether a link was removed.
    pub async fn unlink_item(&self, loan_id: Uuid, item_id: Uuid) -> RepositoryResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM loan_loaned_items WHERE loan_id = $1 AND item_id = $2")
            .bind(loan_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}

/// Repository for loan items
#[derive(Debug, Clone)]
pub struct LoanItemRepository {
    pool: PgPool,
}

impl LoanItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_loan_item: &NewLoanItem) -> RepositoryResult<LoanItem> {
        let loan_item = sqlx::query_as::<_, LoanItem>(
            r#"
            INSERT INTO loan_items (id, loan_id, item_id, amount_paid)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_loan_item.loan_id)
        .bind(new_loan_item.item_id)
        .bind(new_loan_item.amount_paid.value())
        .fetch_one(&self.pool)
        .await?;
        Ok(loan_item)
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<LoanItem> {
        fetch_by_id(&self.pool, id).await
    }

    pub async fn list_for_loan(&self, loan_id: Uuid) -> RepositoryResult<Vec<LoanItem>> {
        let loan_items = sqlx::query_as::<_, LoanItem>("SELECT * FROM loan_items WHERE loan_id = $1")
            .bind(loan_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(loan_items)
    }

    pub async fn update(&self, loan_item: &LoanItem) -> RepositoryResult<LoanItem> {
        sqlx::query_as::<_, LoanItem>(
            "UPDATE loan_items SET amount_paid = $2 WHERE id = $1 RETURNING *",
        )
        .bind(loan_item.id)
        .bind(loan_item.amount_paid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("LoanItem", loan_item.id))
    }

    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<LoanItem, _>(&self.pool, id).await
    }
}
