use async_trait::async_trait;
use chrono::NaiveDate;
use indkob_core::errors::Result;
use indkob_core::meal_plan::{MealPlanDay, MealPlanRepositoryTrait};

use crate::db::MemoryDb;

pub struct MealPlanRepository {
    db: MemoryDb,
}

impl MealPlanRepository {
    pub fn new(db: MemoryDb) -> Self {
        MealPlanRepository { db }
    }
}

#[async_trait]
impl MealPlanRepositoryTrait for MealPlanRepository {
    fn load_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<MealPlanDay>> {
        let tables = self.db.read()?;
        Ok(tables
            .meal_plan
            .range(start..=end)
            .map(|(date, dinner)| MealPlanDay {
                date: *date,
                dinner: Some(dinner.clone()),
            })
            .collect())
    }

    async fn upsert_day(&self, date: NaiveDate, dinner: String) -> Result<MealPlanDay> {
        self.db.write()?.meal_plan.insert(date, dinner.clone());
        Ok(MealPlanDay {
            date,
            dinner: Some(dinner),
        })
    }

    async fn delete_day(&self, date: NaiveDate) -> Result<()> {
        self.db.write()?.meal_plan.remove(&date);
        Ok(())
    }
}
