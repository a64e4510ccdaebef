use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use indkob_core::items::{Item, NewItem};

async fn get_items(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Item>>> {
    let items = state.item_service.get_items()?;
    Ok(Json(items))
}

async fn get_item(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Item>> {
    let item = state.item_service.get_item(id)?;
    Ok(Json(item))
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(new_item): Json<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = state.item_service.create_item(new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Json(changes): Json<NewItem>,
) -> ApiResult<Json<Item>> {
    let item = state.item_service.update_item(id, changes).await?;
    Ok(Json(item))
}

async fn delete_item(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.item_service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", get(get_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
