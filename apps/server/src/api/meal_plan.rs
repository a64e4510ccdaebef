use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use indkob_core::meal_plan::{MealPlanDay, MealPlanDayUpdate};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekQuery {
    week_start: NaiveDate,
}

async fn get_week(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WeekQuery>,
) -> ApiResult<Json<Vec<MealPlanDay>>> {
    let days = state.meal_plan_service.get_week(q.week_start)?;
    Ok(Json(days))
}

async fn upsert_day(
    Path(date): Path<NaiveDate>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<MealPlanDayUpdate>,
) -> ApiResult<Json<MealPlanDay>> {
    let day = state
        .meal_plan_service
        .set_dinner(date, update.dinner)
        .await?;
    Ok(Json(day))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/mealplan", get(get_week))
        .route("/mealplan/{date}", put(upsert_day))
}
