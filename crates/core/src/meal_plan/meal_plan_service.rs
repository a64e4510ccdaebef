use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use super::meal_plan_model::MealPlanDay;
use super::meal_plan_traits::{MealPlanRepositoryTrait, MealPlanServiceTrait};
use crate::constants::{DINNER_MAX_LEN, MEAL_PLAN_WEEK_DAYS};
use crate::errors::{normalize_optional, Result};

pub struct MealPlanService {
    repository: Arc<dyn MealPlanRepositoryTrait>,
}

impl MealPlanService {
    pub fn new(repository: Arc<dyn MealPlanRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl MealPlanServiceTrait for MealPlanService {
    fn get_week(&self, week_start: NaiveDate) -> Result<Vec<MealPlanDay>> {
        let end = week_start + Duration::days(MEAL_PLAN_WEEK_DAYS - 1);
        let stored: HashMap<NaiveDate, Option<String>> = self
            .repository
            .load_days(week_start, end)?
            .into_iter()
            .map(|day| (day.date, day.dinner))
            .collect();

        Ok((0..MEAL_PLAN_WEEK_DAYS)
            .map(|offset| {
                let date = week_start + Duration::days(offset);
                MealPlanDay {
                    date,
                    dinner: stored.get(&date).cloned().flatten(),
                }
            })
            .collect())
    }

    async fn set_dinner(&self, date: NaiveDate, dinner: Option<String>) -> Result<MealPlanDay> {
        match normalize_optional(dinner, "dinner", DINNER_MAX_LEN)? {
            Some(dinner) => self.repository.upsert_day(date, dinner).await,
            None => {
                self.repository.delete_day(date).await?;
                Ok(MealPlanDay { date, dinner: None })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRepository {
        days: Mutex<BTreeMap<NaiveDate, String>>,
    }

    #[async_trait]
    impl MealPlanRepositoryTrait for FakeRepository {
        fn load_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<MealPlanDay>> {
            Ok(self
                .days
                .lock()
                .unwrap()
                .range(start..=end)
                .map(|(date, dinner)| MealPlanDay {
                    date: *date,
                    dinner: Some(dinner.clone()),
                })
                .collect())
        }

        async fn upsert_day(&self, date: NaiveDate, dinner: String) -> Result<MealPlanDay> {
            self.days.lock().unwrap().insert(date, dinner.clone());
            Ok(MealPlanDay {
                date,
                dinner: Some(dinner),
            })
        }

        async fn delete_day(&self, date: NaiveDate) -> Result<()> {
            self.days.lock().unwrap().remove(&date);
            Ok(())
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn week_always_has_seven_days() {
        let service = MealPlanService::new(Arc::new(FakeRepository::default()));
        service
            .set_dinner(date("2025-12-17"), Some(" Lasagne ".into()))
            .await
            .unwrap();

        let week = service.get_week(date("2025-12-15")).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date("2025-12-15"));
        assert_eq!(week[6].date, date("2025-12-21"));
        assert_eq!(week[2].dinner.as_deref(), Some("Lasagne"));
        assert!(week.iter().filter(|d| d.dinner.is_some()).count() == 1);
    }

    #[tokio::test]
    async fn blank_dinner_clears_the_day() {
        let service = MealPlanService::new(Arc::new(FakeRepository::default()));
        let day = date("2025-12-17");
        service.set_dinner(day, Some("Tacos".into())).await.unwrap();

        let cleared = service.set_dinner(day, Some("   ".into())).await.unwrap();
        assert_eq!(cleared.dinner, None);
        assert!(service.get_week(day).unwrap()[0].dinner.is_none());
    }

    #[tokio::test]
    async fn overly_long_dinner_is_rejected() {
        let service = MealPlanService::new(Arc::new(FakeRepository::default()));
        let result = service
            .set_dinner(date("2025-12-17"), Some("x".repeat(DINNER_MAX_LEN + 1)))
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
