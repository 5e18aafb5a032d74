//! Planner store
//!
//! The read/write contract the engine uses against persistent storage, and
//! its SQLite implementation.

use crate::error::{PlanError, PlanResult};
use crate::models::{DailyMacroConfig, DayKey, DayPlan, FoodItem, Meal, MealId, MealTime, Settings};

use super::Database;

/// Source-record storage consumed by the engine
pub trait PlanStore {
    fn get_settings(&self) -> PlanResult<Settings>;

    fn save_settings(&self, settings: &Settings) -> PlanResult<()>;

    /// Macro config plus all six meals (missing ones synthesized) for a day
    fn get_daily_meal_plan(&self, day: DayKey) -> PlanResult<DayPlan>;

    fn save_macro_config(&self, day: DayKey, config: &DailyMacroConfig) -> PlanResult<()>;

    fn save_meal_time(&self, day: DayKey, meal_id: MealId, time: MealTime) -> PlanResult<()>;

    /// Insert or update an item, returning its id
    fn upsert_food_item(&self, day: DayKey, meal_id: MealId, item: &FoodItem) -> PlanResult<i64>;

    /// Returns false when no such item exists in that slot
    fn delete_food_item(&self, day: DayKey, meal_id: MealId, item_id: i64) -> PlanResult<bool>;

    /// Load one stored food item
    fn get_food_item(&self, day: DayKey, meal_id: MealId, item_id: i64) -> PlanResult<FoodItem> {
        let plan = self.get_daily_meal_plan(day)?;
        plan.meal(meal_id)
            .and_then(|meal| meal.items.iter().find(|item| item.id == Some(item_id)))
            .cloned()
            .ok_or(PlanError::FoodItemNotFound {
                day,
                meal_id,
                item_id,
            })
    }
}

impl PlanStore for Database {
    fn get_settings(&self) -> PlanResult<Settings> {
        Ok(self.with_conn(Settings::get)?)
    }

    fn save_settings(&self, settings: &Settings) -> PlanResult<()> {
        Ok(self.with_conn(|conn| Settings::save(conn, settings))?)
    }

    fn get_daily_meal_plan(&self, day: DayKey) -> PlanResult<DayPlan> {
        let conn = self.get_conn()?;
        DayPlan::load(&conn, day)
    }

    fn save_macro_config(&self, day: DayKey, config: &DailyMacroConfig) -> PlanResult<()> {
        Ok(self.with_conn(|conn| DailyMacroConfig::save(conn, day, config))?)
    }

    fn save_meal_time(&self, day: DayKey, meal_id: MealId, time: MealTime) -> PlanResult<()> {
        Ok(self.with_conn(|conn| Meal::save_time(conn, day, meal_id, time))?)
    }

    fn upsert_food_item(&self, day: DayKey, meal_id: MealId, item: &FoodItem) -> PlanResult<i64> {
        Ok(self.with_transaction(|tx| FoodItem::upsert(tx, day, meal_id, item))?)
    }

    fn delete_food_item(&self, day: DayKey, meal_id: MealId, item_id: i64) -> PlanResult<bool> {
        Ok(self.with_conn(|conn| FoodItem::delete(conn, day, meal_id, item_id))?)
    }

    fn get_food_item(&self, day: DayKey, meal_id: MealId, item_id: i64) -> PlanResult<FoodItem> {
        self.with_conn(|conn| FoodItem::get(conn, day, meal_id, item_id))?
            .ok_or(PlanError::FoodItemNotFound {
                day,
                meal_id,
                item_id,
            })
    }
}
