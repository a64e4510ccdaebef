use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Planned dinner for a date. `dinner` is `None` when nothing is planned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanDay {
    pub date: NaiveDate,
    pub dinner: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanDayUpdate {
    pub dinner: Option<String>,
}
