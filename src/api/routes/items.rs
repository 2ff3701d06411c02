//! Item endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::AppError;
use crate::models::{Item, ItemChanges, NewItem};
use crate::repository::ItemRepository;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:item_id",
            get(get_item).patch(update_item).delete(delete_item),
        )
}

async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let item = ItemRepository::new(state.pool).create(request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(ItemRepository::new(state.pool).list().await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(ItemRepository::new(state.pool).get(item_id).await?))
}

async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(changes): Json<ItemChanges>,
) -> Result<Json<Item>, AppError> {
    let items = ItemRepository::new(state.pool);
    let mut item = items.get(item_id).await?;
    changes.apply(&mut item);
    Ok(Json(items.update(item).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ItemRepository::new(state.pool).delete(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
