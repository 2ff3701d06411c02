//! User and trust score endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::AppError;
use crate::models::{
    Loan, NewTrustScore, NewUser, Payment, Savings, SavingsItem, Transaction, TrustScore,
    TrustScoreChanges, User, UserChanges,
};
use crate::repository::{
    LoanRepository, PaymentRepository, RepositoryError, SavingsItemRepository, SavingsRepository,
    TransactionRepository, TrustScoreRepository, UserRepository,
};

use super::MaxLoanAmountResponse;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", axum::routing::post(create_user))
        .route(
            "/users/:user_id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/:user_id/max-loan-amount", get(get_max_loan_amount))
        .route(
            "/users/:user_id/trust-score",
            get(get_trust_score).post(create_trust_score),
        )
        .route(
            "/trust-scores/:trust_score_id",
            axum::routing::patch(update_trust_score).delete(delete_trust_score),
        )
        .route("/users/:user_id/loans", get(list_user_loans))
        .route("/users/:user_id/savings", get(list_user_savings))
        .route("/users/:user_id/savings-items", get(list_user_savings_items))
        .route("/users/:user_id/payments", get(list_user_payments))
        .route("/users/:user_id/transactions", get(list_user_transactions))
}

// =========================================================================
// Users
// =========================================================================

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserRepository::new(state.pool).create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    Ok(Json(UserRepository::new(state.pool).get(user_id).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(changes): Json<UserChanges>,
) -> Result<Json<User>, AppError> {
    let users = UserRepository::new(state.pool);
    let mut user = users.get(user_id).await?;
    changes.apply(&mut user);
    Ok(Json(users.update(user).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    UserRepository::new(state.pool).delete(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `min(score * 100, loan_limit)` for the user
async fn get_max_loan_amount(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MaxLoanAmountResponse>, AppError> {
    let profile = UserRepository::new(state.pool).profile(user_id).await?;
    let max_loan_amount = profile.max_loan_amount(&state.policy)?;
    Ok(Json(MaxLoanAmountResponse {
        user_id,
        max_loan_amount,
    }))
}

// =========================================================================
// Trust scores
// =========================================================================

#[derive(Debug, serde::Deserialize)]
pub struct CreateTrustScoreRequest {
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub is_blacklisted: bool,
}

async fn create_trust_score(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreateTrustScoreRequest>,
) -> Result<(StatusCode, Json<TrustScore>), AppError> {
    let mut new = NewTrustScore::for_user(user_id).blacklisted(request.is_blacklisted);
    if let Some(score) = request.score {
        new = new.with_score(score);
    }
    let trust_score = TrustScoreRepository::new(state.pool).create(new).await?;
    Ok((StatusCode::CREATED, Json(trust_score)))
}

async fn get_trust_score(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<TrustScore>, AppError> {
    let trust_score = TrustScoreRepository::new(state.pool)
        .get_for_user(user_id)
        .await?
        .ok_or(RepositoryError::not_found("TrustScore", user_id))?;
    Ok(Json(trust_score))
}

async fn update_trust_score(
    State(state): State<AppState>,
    Path(trust_score_id): Path<Uuid>,
    Json(changes): Json<TrustScoreChanges>,
) -> Result<Json<TrustScore>, AppError> {
    let trust_scores = TrustScoreRepository::new(state.pool);
    let mut trust_score = trust_scores.get(trust_score_id).await?;
    changes.apply(&mut trust_score);
    Ok(Json(trust_scores.update(trust_score).await?))
}

async fn delete_trust_score(
    State(state): State<AppState>,
    Path(trust_score_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TrustScoreRepository::new(state.pool).delete(trust_score_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Relations
// =========================================================================

async fn list_user_loans(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Loan>>, AppError> {
    Ok(Json(LoanRepository::new(state.pool).list_for_user(user_id).await?))
}

async fn list_user_savings(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Savings>>, AppError> {
    Ok(Json(SavingsRepository::new(state.pool).list_for_user(user_id).await?))
}

async fn list_user_savings_items(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<SavingsItem>>, AppError> {
    Ok(Json(
        SavingsItemRepository::new(state.pool).list_for_user(user_id).await?,
    ))
}

async fn list_user_payments(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(PaymentRepository::new(state.pool).list_for_user(user_id).await?))
}

async fn list_user_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(
        TransactionRepository::new(state.pool).list_for_user(user_id).await?,
    ))
}
