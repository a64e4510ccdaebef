use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use indkob_core::grocery::{GroceryEntry, GroceryEntryUpdate, NewGroceryEntry};

/// Get the whole list, open entries first
async fn get_entries(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<GroceryEntry>>> {
    let entries = state.grocery_service.get_entries()?;
    Ok(Json(entries))
}

async fn get_entry(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<GroceryEntry>> {
    let entry = state.grocery_service.get_entry(id)?;
    Ok(Json(entry))
}

async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(new_entry): Json<NewGroceryEntry>,
) -> ApiResult<(StatusCode, Json<GroceryEntry>)> {
    let entry = state.grocery_service.create_entry(new_entry).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_entry(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<GroceryEntryUpdate>,
) -> ApiResult<Json<GroceryEntry>> {
    let entry = state.grocery_service.update_entry(id, update).await?;
    Ok(Json(entry))
}

async fn delete_entry(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.grocery_service.delete_entry(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove every entry from the list
async fn clear_entries(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    let removed = state.grocery_service.clear_entries().await?;
    tracing::info!("Grocery list cleared ({} entries)", removed);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/groceryentries",
            get(get_entries).post(create_entry).delete(clear_entries),
        )
        .route(
            "/groceryentries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}
