//! Data models
//!
//! Rust structs for the planner's source records and their SQLite mapping.

mod day_key;
mod food_item;
mod macro_config;
mod meal;
mod nutrition;
mod settings;

pub use day_key::DayKey;
pub use food_item::FoodItem;
pub use macro_config::DailyMacroConfig;
pub use meal::{DayPlan, Meal, MealId, MealTime, MEALS_PER_DAY};
pub use nutrition::Nutrients;
pub use settings::{
    Settings, SettingsUpdate, UnitSystem, DEFAULT_GOAL_CALORIES, DEFAULT_MEAL_INTERVAL_HOURS,
    DEFAULT_WEIGHT_KG,
};
