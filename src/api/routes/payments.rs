//! Payment and transaction endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::AppError;
use crate::models::{
    NewPayment, NewTransaction, Payment, PaymentChanges, Transaction, TransactionChanges,
};
use crate::repository::{PaymentRepository, TransactionRepository};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(create_payment))
        .route(
            "/payments/:payment_id",
            get(get_payment).patch(update_payment).delete(delete_payment),
        )
        .route("/transactions", post(create_transaction))
        .route(
            "/transactions/:transaction_id",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

// =========================================================================
// Payments
// =========================================================================

async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<NewPayment>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = PaymentRepository::new(state.pool).create(&request).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(PaymentRepository::new(state.pool).get(payment_id).await?))
}

async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(changes): Json<PaymentChanges>,
) -> Result<Json<Payment>, AppError> {
    let payments = PaymentRepository::new(state.pool);
    let mut payment = payments.get(payment_id).await?;
    changes.apply(&mut payment);
    Ok(Json(payments.update(&payment).await?))
}

async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    PaymentRepository::new(state.pool).delete(payment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Transactions
// =========================================================================

async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = TransactionRepository::new(state.pool).create(&request).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    Ok(Json(
        TransactionRepository::new(state.pool).get(transaction_id).await?,
    ))
}

async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(changes): Json<TransactionChanges>,
) -> Result<Json<Transaction>, AppError> {
    let transactions = TransactionRepository::new(state.pool);
    let mut transaction = transactions.get(transaction_id).await?;
    changes.apply(&mut transaction);
    Ok(Json(transactions.update(&transaction).await?))
}

async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TransactionRepository::new(state.pool).delete(transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
