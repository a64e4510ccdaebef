//! In-process storage for the meal plan.

mod repository;

pub use repository::MealPlanRepository;
