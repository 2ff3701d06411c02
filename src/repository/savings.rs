//! Savings Repository
//!
//! Every write of a savings plan goes through `SaveInvariant::enforce`, so
//! the stored end date is always `start_date + SAVINGS_PERIOD_DAYS`.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{NewSavings, NewSavingsItem, SaveInvariant, Savings, SavingsItem};

use super::{delete_by_id, fetch_by_id, RepositoryError, RepositoryResult};

/// Sum of `amount_saved` over the plans of a goal, zero when it has none.
pub(crate) async fn amount_saved<'e, E: PgExecutor<'e>>(
    executor: E,
    savings_item_id: Uuid,
) -> RepositoryResult<Decimal> {
    let total: Decimal = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_saved), 0) FROM savings WHERE savings_item_id = $1",
    )
    .bind(savings_item_id)
    .fetch_one(executor)
    .await?;
    Ok(total)
}

/// Insert a plan. An opening `amount_saved` counts as paid in.
pub(crate) async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    mut new_savings: NewSavings,
) -> RepositoryResult<Savings> {
    new_savings.enforce()?;

    let savings = sqlx::query_as::<_, Savings>(
        r#"
        INSERT INTO savings (
            id, user_id, savings_item_id, amount_saved, start_date, end_date, total_paid
        )
        VALUES ($1, $2, $3, $4, $5, $6, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_savings.user_id)
    .bind(new_savings.savings_item_id)
    .bind(new_savings.amount_saved.value())
    .bind(new_savings.start_date)
    .bind(new_savings.end_date)
    .fetch_one(executor)
    .await?;

    Ok(savings)
}

/// Load a plan and lock its row until the surrounding transaction ends.
pub(crate) async fn fetch_for_update<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> RepositoryResult<Savings> {
    sqlx::query_as::<_, Savings>("SELECT * FROM savings WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Savings", id))
}

pub(crate) async fn save<'e, E: PgExecutor<'e>>(executor: E, mut savings: Savings) -> RepositoryResult<Savings> {
    savings.enforce()?;

    sqlx::query_as::<_, Savings>(
        r#"
        UPDATE savings
        SET amount_saved = $2,
            start_date = $3,
            end_date = $4,
            total_paid = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(savings.id)
    .bind(savings.amount_saved)
    .bind(savings.start_date)
    .bind(savings.end_date)
    .bind(savings.total_paid)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepositoryError::not_found("Savings", savings.id))
}

/// Repository for savings goals
#[derive(Debug, Clone)]
pub struct SavingsItemRepository {
    pool: PgPool,
}

impl SavingsItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_goal: &NewSavingsItem) -> RepositoryResult<SavingsItem> {
        let goal = sqlx::query_as::<_, SavingsItem>(
            r#"
            INSERT INTO savings_items (id, user_id, item_id, target_amount, start_date, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_goal.user_id)
        .bind(new_goal.item_id)
        .bind(new_goal.target_amount.value())
        .bind(new_goal.start_date)
        .bind(new_goal.due_date)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            savings_item_id = %goal.id,
            user_id = %goal.user_id,
            target_amount = %goal.target_amount,
            "Savings goal created"
        );
        Ok(goal)
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<SavingsItem> {
        fetch_by_id(&self.pool, id).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<SavingsItem>> {
        let goals = sqlx::query_as::<_, SavingsItem>(
            "SELECT * FROM savings_items WHERE user_id = $1 ORDER BY due_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(goals)
    }

    /// Total saved toward a goal across its plans
    pub async fn amount_saved(&self, savings_item_id: Uuid) -> RepositoryResult<Decimal> {
        amount_saved(&self.pool, savings_item_id).await
    }

    pub async fn update(&self, goal: &SavingsItem) -> RepositoryResult<SavingsItem> {
        sqlx::query_as::<_, SavingsItem>(
            r#"
            UPDATE savings_items
            SET target_amount = $2, due_date = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(goal.id)
        .bind(goal.target_amount)
        .bind(goal.due_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("SavingsItem", goal.id))
    }

    /// Delete a goal together with its savings plans.
    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<SavingsItem, _>(&self.pool, id).await
    }
}

/// Repository for savings plans
#[derive(Debug, Clone)]
pub struct SavingsRepository {
    pool: PgPool,
}

impl SavingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a plan. Any supplied end date is replaced by the computed one.
    pub async fn create(&self, new_savings: NewSavings) -> RepositoryResult<Savings> {
        let savings = insert(&self.pool, new_savings).await?;
        tracing::info!(
            savings_id = %savings.id,
            start_date = %savings.start_date,
            end_date = %savings.end_date,
            "Savings plan created"
        );
        Ok(savings)
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Savings> {
        fetch_by_id(&self.pool, id).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Savings>> {
        let plans = sqlx::query_as::<_, Savings>(
            "SELECT * FROM savings WHERE user_id = $1 ORDER BY start_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    pub async fn list_for_savings_item(&self, savings_item_id: Uuid) -> RepositoryResult<Vec<Savings>> {
        let plans = sqlx::query_as::<_, Savings>(
            "SELECT * FROM savings WHERE savings_item_id = $1 ORDER BY start_date",
        )
        .bind(savings_item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    /// Write every column of `savings`. The end date is recomputed first.
    pub async fn update(&self, savings: Savings) -> RepositoryResult<Savings> {
        save(&self.pool, savings).await
    }

    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<Savings, _>(&self.pool, id).await
    }
}
