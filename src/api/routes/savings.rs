//! Savings goal and savings plan endpoints

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::OperationContext;
use crate::error::AppError;
use crate::handlers::{DepositResult, DepositSavingsCommand, DepositSavingsHandler};
use crate::models::{
    today, NewSavings, NewSavingsItem, Payment, Savings, SavingsChanges, SavingsItem,
    SavingsItemChanges, SavingsItemOverview, SavingsOverview, Transaction,
};
use crate::repository::{
    ItemRepository, PaymentRepository, SavingsItemRepository, SavingsRepository,
    TransactionRepository,
};

use super::AmountRequest;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/savings-items", post(create_savings_item))
        .route(
            "/savings-items/:savings_item_id",
            get(get_savings_item)
                .patch(update_savings_item)
                .delete(delete_savings_item),
        )
        .route(
            "/savings-items/:savings_item_id/summary",
            get(get_savings_item_summary),
        )
        .route(
            "/savings-items/:savings_item_id/savings",
            get(list_goal_savings),
        )
        .route("/savings", post(create_savings))
        .route(
            "/savings/:savings_id",
            get(get_savings).patch(update_savings).delete(delete_savings),
        )
        .route("/savings/:savings_id/summary", get(get_savings_summary))
        .route("/savings/:savings_id/deposit", post(deposit))
        .route("/savings/:savings_id/payments", get(list_savings_payments))
        .route(
            "/savings/:savings_id/transactions",
            get(list_savings_transactions),
        )
}

// =========================================================================
// Savings goals
// =========================================================================

async fn create_savings_item(
    State(state): State<AppState>,
    Json(request): Json<NewSavingsItem>,
) -> Result<(StatusCode, Json<SavingsItem>), AppError> {
    let goal = SavingsItemRepository::new(state.pool).create(&request).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn get_savings_item(
    State(state): State<AppState>,
    Path(savings_item_id): Path<Uuid>,
) -> Result<Json<SavingsItem>, AppError> {
    Ok(Json(
        SavingsItemRepository::new(state.pool).get(savings_item_id).await?,
    ))
}

async fn update_savings_item(
    State(state): State<AppState>,
    Path(savings_item_id): Path<Uuid>,
    Json(changes): Json<SavingsItemChanges>,
) -> Result<Json<SavingsItem>, AppError> {
    let goals = SavingsItemRepository::new(state.pool);
    let mut goal = goals.get(savings_item_id).await?;
    changes.apply(&mut goal);
    Ok(Json(goals.update(&goal).await?))
}

async fn delete_savings_item(
    State(state): State<AppState>,
    Path(savings_item_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    SavingsItemRepository::new(state.pool).delete(savings_item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_savings_item_summary(
    State(state): State<AppState>,
    Path(savings_item_id): Path<Uuid>,
) -> Result<Json<SavingsItemOverview>, AppError> {
    let goals = SavingsItemRepository::new(state.pool);
    let goal = goals.get(savings_item_id).await?;
    let amount_saved = goals.amount_saved(savings_item_id).await?;
    Ok(Json(SavingsItemOverview::new(&goal, amount_saved, today())))
}

async fn list_goal_savings(
    State(state): State<AppState>,
    Path(savings_item_id): Path<Uuid>,
) -> Result<Json<Vec<Savings>>, AppError> {
    Ok(Json(
        SavingsRepository::new(state.pool)
            .list_for_savings_item(savings_item_id)
            .await?,
    ))
}

// =========================================================================
// Savings plans
// =========================================================================

async fn create_savings(
    State(state): State<AppState>,
    Json(request): Json<NewSavings>,
) -> Result<(StatusCode, Json<Savings>), AppError> {
    let savings = SavingsRepository::new(state.pool).create(request).await?;
    Ok((StatusCode::CREATED, Json(savings)))
}

async fn get_savings(
    State(state): State<AppState>,
    Path(savings_id): Path<Uuid>,
) -> Result<Json<Savings>, AppError> {
    Ok(Json(SavingsRepository::new(state.pool).get(savings_id).await?))
}

async fn update_savings(
    State(state): State<AppState>,
    Path(savings_id): Path<Uuid>,
    Json(changes): Json<SavingsChanges>,
) -> Result<Json<Savings>, AppError> {
    let plans = SavingsRepository::new(state.pool);
    let mut savings = plans.get(savings_id).await?;
    changes.apply(&mut savings);
    Ok(Json(plans.update(savings).await?))
}

async fn delete_savings(
    State(state): State<AppState>,
    Path(savings_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    SavingsRepository::new(state.pool).delete(savings_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_savings_summary(
    State(state): State<AppState>,
    Path(savings_id): Path<Uuid>,
) -> Result<Json<SavingsOverview>, AppError> {
    let savings = SavingsRepository::new(state.pool.clone()).get(savings_id).await?;
    let goal = SavingsItemRepository::new(state.pool.clone())
        .get(savings.savings_item_id)
        .await?;
    let item = ItemRepository::new(state.pool).get(goal.item_id).await?;
    Ok(Json(SavingsOverview::new(&savings, &goal, &item, today())))
}

async fn deposit(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(savings_id): Path<Uuid>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<DepositResult>, AppError> {
    let handler = DepositSavingsHandler::new(state.pool);

    let command = DepositSavingsCommand::new(savings_id, request.amount);
    let command = match request.description {
        Some(description) => command.with_description(description),
        None => command,
    };

    Ok(Json(handler.execute(command, &context).await?))
}

async fn list_savings_payments(
    State(state): State<AppState>,
    Path(savings_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(
        PaymentRepository::new(state.pool).list_for_savings(savings_id).await?,
    ))
}

async fn list_savings_transactions(
    State(state): State<AppState>,
    Path(savings_id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(
        TransactionRepository::new(state.pool)
            .list_for_savings(savings_id)
            .await?,
    ))
}
