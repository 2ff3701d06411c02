//! Repositories
//!
//! Data access for the ledger tables. Each repository owns a pool for
//! standalone calls; the `pub(crate)` free functions in each module take
//! any executor so handlers can run them inside one database transaction.

pub mod item;
pub mod loan;
pub mod payment;
pub mod savings;
pub mod transaction;
pub mod trust_score;
pub mod user;

pub use item::ItemRepository;
pub use loan::{LoanItemRepository, LoanRepository};
pub use payment::PaymentRepository;
pub use savings::{SavingsItemRepository, SavingsRepository};
pub use transaction::TransactionRepository;
pub use trust_score::TrustScoreRepository;
pub use user::UserRepository;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::models::Record;

/// PostgreSQL SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL SQLSTATE for string_data_right_truncation
const VALUE_TOO_LONG: &str = "22001";

/// PostgreSQL SQLSTATE for numeric_value_out_of_range
const NUMERIC_OUT_OF_RANGE: &str = "22003";

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository Error
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Duplicate value violates unique constraint {0}")]
    Duplicate(String),

    #[error("Referenced record does not exist ({0})")]
    MissingReference(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// A value does not fit its column
    #[error("Value does not fit its column: {0}")]
    InvalidValue(String),

    /// The record broke a write-path rule and was not written
    #[error(transparent)]
    Rejected(#[from] DomainError),

    #[error("Stored value could not be decoded: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return Self::Duplicate(constraint),
                Some(FOREIGN_KEY_VIOLATION) => return Self::MissingReference(constraint),
                Some(VALUE_TOO_LONG) | Some(NUMERIC_OUT_OF_RANGE) => {
                    return Self::InvalidValue(db_err.message().to_string())
                }
                _ => {}
            }
        }
        Self::Database(e)
    }
}

/// Load a record by id, failing with `NotFound` when absent.
pub(crate) async fn fetch_by_id<'e, R, E>(executor: E, id: Uuid) -> RepositoryResult<R>
where
    R: Record + for<'r> FromRow<'r, PgRow> + Send + Unpin,
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT * FROM {} WHERE id = $1", R::TABLE);
    sqlx::query_as::<_, R>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| RepositoryError::not_found(R::ENTITY, id))
}

/// Delete a record by id, failing with `NotFound` when nothing was deleted.
/// Dependent rows go with it through the schema's ON DELETE CASCADE.
pub(crate) async fn delete_by_id<'e, R, E>(executor: E, id: Uuid) -> RepositoryResult<()>
where
    R: Record,
    E: PgExecutor<'e>,
{
    let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
    let rows_affected = sqlx::query(&sql)
        .bind(id)
        .execute(executor)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(RepositoryError::not_found(R::ENTITY, id));
    }

    tracing::debug!(entity = R::ENTITY, %id, "Record deleted");
    Ok(())
}
