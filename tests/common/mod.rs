//! Common test utilities

#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use uuid::Uuid;

use mamapesa::models::{NewUser, User};
use mamapesa::repository::UserRepository;

const SCHEMA: &str = include_str!("../../schema/ledger.sql");

/// Serializes schema creation across test binaries running in parallel
const SCHEMA_LOCK_KEY: i64 = 0x6d61_6d61;

/// Connect to DATABASE_URL and make sure the ledger schema exists.
///
/// Tables are not truncated: tests run concurrently against the same
/// database, so each test creates its own uniquely keyed rows.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .expect("Failed to take schema lock");
    (&mut *conn).execute(SCHEMA).await.expect("Failed to apply schema");
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .expect("Failed to release schema lock");

    pool
}

/// Digits derived from a fresh UUID, for unique phone and id numbers
pub fn unique_digits(len: u32) -> String {
    let n = Uuid::new_v4().as_u128() % 10u128.pow(len);
    format!("{:0width$}", n, width = len as usize)
}

/// A user payload whose unique columns will not collide with other tests
pub fn new_user(name: &str) -> NewUser {
    NewUser::new(
        name,
        format!("{}.{}@Example.COM", name, Uuid::new_v4().simple()),
        format!("07{}", unique_digits(8)),
        unique_digits(12),
    )
}

pub async fn create_user(pool: &PgPool, name: &str) -> User {
    UserRepository::new(pool.clone())
        .create(new_user(name))
        .await
        .expect("Failed to create user")
}
