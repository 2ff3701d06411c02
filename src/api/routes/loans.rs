//! Loan endpoints
//!
//! Record-level CRUD plus the application and repayment operations.
//! `POST /loans` writes the row as given; `POST /loans/apply` is the checked
//! path that enforces the borrower's limit.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::OperationContext;
use crate::error::AppError;
use crate::handlers::{
    ApplyForLoanCommand, ApplyForLoanHandler, LoanApplicationResult, RepayLoanCommand,
    RepayLoanHandler, RepaymentResult,
};
use crate::models::{
    Item, Loan, LoanChanges, LoanItem, LoanItemChanges, LoanOverview, NewLoan, NewLoanItem,
    Payment, Transaction,
};
use crate::repository::{
    ItemRepository, LoanItemRepository, LoanRepository, PaymentRepository, RepositoryError,
    TransactionRepository,
};

use super::AmountRequest;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans", post(create_loan))
        .route("/loans/apply", post(apply_for_loan))
        .route(
            "/loans/:loan_id",
            get(get_loan).patch(update_loan).delete(delete_loan),
        )
        .route("/loans/:loan_id/summary", get(get_loan_summary))
        .route("/loans/:loan_id/repay", post(repay_loan))
        .route("/loans/:loan_id/items", get(list_loaned_items))
        .route(
            "/loans/:loan_id/items/:item_id",
            put(link_item).delete(unlink_item),
        )
        .route("/loans/:loan_id/loan-items", get(list_loan_items))
        .route("/loans/:loan_id/payments", get(list_loan_payments))
        .route("/loans/:loan_id/transactions", get(list_loan_transactions))
        .route("/loan-items", post(create_loan_item))
        .route(
            "/loan-items/:loan_item_id",
            get(get_loan_item)
                .patch(update_loan_item)
                .delete(delete_loan_item),
        )
}

// =========================================================================
// Operations
// =========================================================================

/// Apply for a loan within the borrower's maximum loan amount
async fn apply_for_loan(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(command): Json<ApplyForLoanCommand>,
) -> Result<(StatusCode, Json<LoanApplicationResult>), AppError> {
    let handler = ApplyForLoanHandler::new(state.pool, state.policy);
    let result = handler.execute(command, &context).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn repay_loan(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(loan_id): Path<Uuid>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<RepaymentResult>, AppError> {
    let handler = RepayLoanHandler::new(state.pool);

    let command = RepayLoanCommand::new(loan_id, request.amount);
    let command = match request.description {
        Some(description) => command.with_description(description),
        None => command,
    };

    Ok(Json(handler.execute(command, &context).await?))
}

async fn get_loan_summary(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<LoanOverview>, AppError> {
    let loan = LoanRepository::new(state.pool.clone()).get(loan_id).await?;
    let loaned_items = ItemRepository::new(state.pool).list_for_loan(loan_id).await?;
    Ok(Json(LoanOverview::new(&loan, &loaned_items, &state.policy)))
}

// =========================================================================
// Loans
// =========================================================================

async fn create_loan(
    State(state): State<AppState>,
    Json(request): Json<NewLoan>,
) -> Result<(StatusCode, Json<Loan>), AppError> {
    let loan = LoanRepository::new(state.pool).create(&request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

async fn get_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<Loan>, AppError> {
    Ok(Json(LoanRepository::new(state.pool).get(loan_id).await?))
}

async fn update_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
    Json(changes): Json<LoanChanges>,
) -> Result<Json<Loan>, AppError> {
    let loans = LoanRepository::new(state.pool);
    let mut loan = loans.get(loan_id).await?;
    changes.apply(&mut loan);
    Ok(Json(loans.update(&loan).await?))
}

async fn delete_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LoanRepository::new(state.pool).delete(loan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_loaned_items(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(ItemRepository::new(state.pool).list_for_loan(loan_id).await?))
}

async fn link_item(
    State(state): State<AppState>,
    Path((loan_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    LoanRepository::new(state.pool).link_item(loan_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unlink_item(
    State(state): State<AppState>,
    Path((loan_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    if LoanRepository::new(state.pool).unlink_item(loan_id, item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(RepositoryError::not_found("Loaned item", item_id).into())
    }
}

async fn list_loan_payments(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(PaymentRepository::new(state.pool).list_for_loan(loan_id).await?))
}

async fn list_loan_transactions(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(
        TransactionRepository::new(state.pool).list_for_loan(loan_id).await?,
    ))
}

// =========================================================================
// Loan items
// =========================================================================

async fn create_loan_item(
    State(state): State<AppState>,
    Json(request): Json<NewLoanItem>,
) -> Result<(StatusCode, Json<LoanItem>), AppError> {
    let loan_item = LoanItemRepository::new(state.pool).create(&request).await?;
    Ok((StatusCode::CREATED, Json(loan_item)))
}

async fn get_loan_item(
    State(state): State<AppState>,
    Path(loan_item_id): Path<Uuid>,
) -> Result<Json<LoanItem>, AppError> {
    Ok(Json(LoanItemRepository::new(state.pool).get(loan_item_id).await?))
}

async fn list_loan_items(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<Vec<LoanItem>>, AppError> {
    Ok(Json(
        LoanItemRepository::new(state.pool).list_for_loan(loan_id).await?,
    ))
}

async fn update_loan_item(
    State(state): State<AppState>,
    Path(loan_item_id): Path<Uuid>,
    Json(changes): Json<LoanItemChanges>,
) -> Result<Json<LoanItem>, AppError> {
    let loan_items = LoanItemRepository::new(state.pool);
    let mut loan_item = loan_items.get(loan_item_id).await?;
    changes.apply(&mut loan_item);
    Ok(Json(loan_items.update(&loan_item).await?))
}

async fn delete_loan_item(
    State(state): State<AppState>,
    Path(loan_item_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LoanItemRepository::new(state.pool).delete(loan_item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
