//! Transaction Repository
//!
//! Rows are read as `TransactionRow` and decoded; an unknown type string in
//! the table surfaces as `RepositoryError::Corrupt`.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::transaction::TransactionRow;
use crate::models::{NewTransaction, Transaction};

use super::{delete_by_id, fetch_by_id, RepositoryError, RepositoryResult};

fn decode(row: TransactionRow) -> RepositoryResult<Transaction> {
    let id = row.id;
    Transaction::try_from(row).map_err(|e| {
        tracing::error!(transaction_id = %id, error = %e, "Undecodable transaction row");
        RepositoryError::Corrupt(e.to_string())
    })
}

fn decode_all(rows: Vec<TransactionRow>) -> RepositoryResult<Vec<Transaction>> {
    rows.into_iter().map(decode).collect()
}

pub(crate) async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    new_transaction: &NewTransaction,
) -> RepositoryResult<Transaction> {
    let row = sqlx::query_as::<_, TransactionRow>(
        r#"
        INSERT INTO transactions (
            id, user_id, amount, description, transaction_type, loan_id, savings_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_transaction.user_id)
    .bind(new_transaction.amount.value())
    .bind(&new_transaction.description)
    .bind(new_transaction.transaction_type.as_str())
    .bind(new_transaction.loan_id)
    .bind(new_transaction.savings_id)
    .fetch_one(executor)
    .await?;

    decode(row)
}

/// Repository for transactions
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_transaction: &NewTransaction) -> RepositoryResult<Transaction> {
        insert(&self.pool, new_transaction).await
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Transaction> {
        let row: TransactionRow = fetch_by_id(&self.pool, id).await?;
        decode(row)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Transaction>> {
        self.list_where("user_id", user_id).await
    }

    pub async fn list_for_loan(&self, loan_id: Uuid) -> RepositoryResult<Vec<Transaction>> {
        self.list_where("loan_id", loan_id).await
    }

    pub async fn list_for_savings(&self, savings_id: Uuid) -> RepositoryResult<Vec<Transaction>> {
        self.list_where("savings_id", savings_id).await
    }

    pub async fn update(&self, transaction: &Transaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions
            SET amount = $2, description = $3, transaction_type = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.amount)
        .bind(&transaction.description)
        .bind(transaction.transaction_type.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Transaction", transaction.id))?;

        decode(row)
    }

    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<TransactionRow, _>(&self.pool, id).await
    }

    async fn list_where(&self, column: &'static str, id: Uuid) -> RepositoryResult<Vec<Transaction>> {
        let sql = format!(
            "SELECT * FROM transactions WHERE {} = $1 ORDER BY \"timestamp\" DESC",
            column
        );
        let rows = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        decode_all(rows)
    }
}
