//! Database module
//!
//! Connectivity and schema checks run at startup. The schema itself lives
//! in schema/ledger.sql.

use sqlx::PgPool;

/// Tables the ledger reads and writes
pub const REQUIRED_TABLES: [&str; 10] = [
    "users",
    "trust_scores",
    "items",
    "loans",
    "loan_items",
    "loan_loaned_items",
    "savings_items",
    "savings",
    "payments",
    "transactions",
];

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    tracing::debug!(tables = REQUIRED_TABLES.len(), "Schema verified");
    Ok(true)
}
