//! Trust Score Repository

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{NewTrustScore, TrustScore};

use super::{delete_by_id, fetch_by_id, RepositoryError, RepositoryResult};

pub(crate) async fn find_for_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> RepositoryResult<Option<TrustScore>> {
    let trust_score = sqlx::query_as::<_, TrustScore>("SELECT * FROM trust_scores WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
    Ok(trust_score)
}

/// Repository for trust scores
#[derive(Debug, Clone)]
pub struct TrustScoreRepository {
    pool: PgPool,
}

impl TrustScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the trust score of a user. A second one for the same user is a
    /// `Duplicate` error.
    pub async fn create(&self, new: NewTrustScore) -> RepositoryResult<TrustScore> {
        let trust_score = sqlx::query_as::<_, TrustScore>(
            r#"
            INSERT INTO trust_scores (id, user_id, score, is_blacklisted)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.score)
        .bind(new.is_blacklisted)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            user_id = %trust_score.user_id,
            score = trust_score.score,
            "Trust score created"
        );
        Ok(trust_score)
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<TrustScore> {
        fetch_by_id(&self.pool, id).await
    }

    pub async fn get_for_user(&self, user_id: Uuid) -> RepositoryResult<Option<TrustScore>> {
        find_for_user(&self.pool, user_id).await
    }

    pub async fn update(&self, trust_score: TrustScore) -> RepositoryResult<TrustScore> {
        sqlx::query_as::<_, TrustScore>(
            r#"
            UPDATE trust_scores
            SET score = $2, is_blacklisted = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(trust_score.id)
        .bind(trust_score.score)
        .bind(trust_score.is_blacklisted)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("TrustScore", trust_score.id))
    }

    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        delete_by_id::<TrustScore, _>(&self.pool, id).await
    }
}
