//! Item Repository

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Item, NewItem};

use super::{delete_by_id, fetch_by_id, RepositoryError, RepositoryResult};

/// Items linked to a loan through `loan_loaned_items`
pub(crate) async fn list_for_loan<'e, E: PgExecutor<'e>>(
    executor: E,
    loan_id: Uuid,
) -> RepositoryResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        r#"
        SELECT i.*
        FROM items i
        JOIN loan_loaned_items l ON l.item_id = i.id
        WHERE l.loan_id = $1
        ORDER BY i.name
        "#,
    )
    .bind(loan_id)
    .fetch_all(executor)
    .await?;
    Ok(items)
}

/// Repository for items
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_item: NewItem) -> RepositoryResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (id, name, description, in_stock)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_item.name)
        .bind(&new_item.description)
        .bind(new_item.in_stock)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(item_id = %item.id, name = %item.name, "Item created");
        Ok(item)
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Item> {
        fetch_by_id(&self.pool, id).await
    }

    pub async fn list(&self) -> RepositoryResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Items referenced by a loan
    pub async fn list_for_loan(&self, loan_id: Uuid) -> RepositoryResult<Vec<Item>> {
        list_for_loan(&self.pool, loan_id).await
    }

    pub async fn update(&self, item: Item) -> RepositoryResult<Item> {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = $2, description = $3, in_stock = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.in_stock)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Item", item.id))
    }

    /// Delete an item; loan items, savings goals and loan links that
    /// reference it are removed by cascade.
    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<Item, _>(&self.pool, id).await
    }
}
