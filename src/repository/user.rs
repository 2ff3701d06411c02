//! User Repository

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::user::normalize_email;
use crate::models::{NewUser, SaveInvariant, User, UserProfile};

use super::{delete_by_id, fetch_by_id, trust_score, RepositoryError, RepositoryResult};

pub(crate) async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    mut new_user: NewUser,
) -> RepositoryResult<User> {
    new_user.enforce()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password, phone_number, id_number)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password)
    .bind(&new_user.phone_number)
    .bind(&new_user.id_number)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

pub(crate) async fn fetch<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> RepositoryResult<User> {
    fetch_by_id::<User, _>(executor, id).await
}

pub(crate) async fn save<'e, E: PgExecutor<'e>>(executor: E, mut user: User) -> RepositoryResult<User> {
    user.enforce()?;

    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = $2,
            email = $3,
            password = $4,
            phone_number = $5,
            id_number = $6,
            loan_count = $7,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password)
    .bind(&user.phone_number)
    .bind(&user.id_number)
    .bind(user.loan_count)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepositoryError::not_found("User", user.id))
}

pub(crate) async fn increment_loan_count<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> RepositoryResult<i32> {
    sqlx::query_scalar(
        r#"
        UPDATE users
        SET loan_count = loan_count + 1, updated_at = NOW()
        WHERE id = $1
        RETURNING loan_count
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepositoryError::not_found("User", id))
}

/// Repository for users
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user. The email is lowercased before the insert.
    pub async fn create(&self, new_user: NewUser) -> RepositoryResult<User> {
        let user = insert(&self.pool, new_user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<User> {
        fetch(&self.pool, id).await
    }

    /// Look a user up by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Write every column of `user`. The email is lowercased before the update.
    pub async fn update(&self, user: User) -> RepositoryResult<User> {
        save(&self.pool, user).await
    }

    /// Delete a user and, through cascades, everything they own.
    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<User, _>(&self.pool, id).await
    }

    /// The user with their trust score, if any.
    pub async fn profile(&self, id: Uuid) -> RepositoryResult<UserProfile> {
        let user = fetch(&self.pool, id).await?;
        let trust_score = trust_score::find_for_user(&self.pool, id).await?;
        Ok(UserProfile::new(user, trust_score))
    }
}
