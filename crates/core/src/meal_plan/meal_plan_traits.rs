use crate::errors::Result;
use crate::meal_plan::meal_plan_model::MealPlanDay;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for meal plan repository operations
#[async_trait]
pub trait MealPlanRepositoryTrait: Send + Sync {
    /// Returns stored days within `start..=end`.
    fn load_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<MealPlanDay>>;
    async fn upsert_day(&self, date: NaiveDate, dinner: String) -> Result<MealPlanDay>;
    /// Removes a stored day. Removing a day that is not stored is not an error.
    async fn delete_day(&self, date: NaiveDate) -> Result<()>;
}

/// Trait for meal plan service operations
#[async_trait]
pub trait MealPlanServiceTrait: Send + Sync {
    /// Returns exactly seven days starting at `week_start`.
    fn get_week(&self, week_start: NaiveDate) -> Result<Vec<MealPlanDay>>;
    /// Sets the dinner for a date; a blank dinner clears the day.
    async fn set_dinner(&self, date: NaiveDate, dinner: Option<String>) -> Result<MealPlanDay>;
}
