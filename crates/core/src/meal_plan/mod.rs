//! Meal plan module - one planned dinner per day.

mod meal_plan_model;
mod meal_plan_service;
mod meal_plan_traits;

pub use meal_plan_model::{MealPlanDay, MealPlanDayUpdate};
pub use meal_plan_service::MealPlanService;
pub use meal_plan_traits::{MealPlanRepositoryTrait, MealPlanServiceTrait};
