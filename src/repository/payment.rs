//! Payment Repository

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{NewPayment, Payment};

use super::{delete_by_id, fetch_by_id, RepositoryError, RepositoryResult};

pub(crate) async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    new_payment: &NewPayment,
) -> RepositoryResult<Payment> {
    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (
            id, user_id, amount, description,
            is_loan_payment, is_savings_payment, loan_id, savings_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_payment.user_id)
    .bind(new_payment.amount.value())
    .bind(&new_payment.description)
    .bind(new_payment.is_loan_payment)
    .bind(new_payment.is_savings_payment)
    .bind(new_payment.loan_id)
    .bind(new_payment.savings_id)
    .fetch_one(executor)
    .await?;

    Ok(payment)
}

/// Repository for payments
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_payment: &NewPayment) -> RepositoryResult<Payment> {
        insert(&self.pool, new_payment).await
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Payment> {
        fetch_by_id(&self.pool, id).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Payment>> {
        self.list_where("user_id", user_id).await
    }

    pub async fn list_for_loan(&self, loan_id: Uuid) -> RepositoryResult<Vec<Payment>> {
        self.list_where("loan_id", loan_id).await
    }

    pub async fn list_for_savings(&self, savings_id: Uuid) -> RepositoryResult<Vec<Payment>> {
        self.list_where("savings_id", savings_id).await
    }

    pub async fn update(&self, payment: &Payment) -> RepositoryResult<Payment> {
        sqlx::query_as::<_, Payment>(
            "UPDATE payments SET amount = $2, description = $3 WHERE id = $1 RETURNING *",
        )
        .bind(payment.id)
        .bind(payment.amount)
        .bind(&payment.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Payment", payment.id))
    }

    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<Payment, _>(&self.pool, id).await
    }

    // `column` is always one of the literals above
    async fn list_where(&self, column: &'static str, id: Uuid) -> RepositoryResult<Vec<Payment>> {
        let sql = format!("SELECT * FROM payments WHERE {} = $1 ORDER BY \"date\" DESC", column);
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(payments)
    }
}
