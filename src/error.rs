//! Engine error types

use thiserror::Error;

use crate::db::DbError;
use crate::models::{DayKey, MealId};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid amount: {0} (must be a non-negative number)")]
    InvalidAmount(f64),

    #[error("Invalid meal id: {0} (expected 1-6)")]
    InvalidMealId(i64),

    #[error("Invalid time '{0}' (expected HH:MM, 24h)")]
    InvalidTime(String),

    #[error("Invalid meal interval: {0} hours")]
    InvalidInterval(f64),

    #[error("Unknown day key: {0}")]
    UnknownDayKey(String),

    #[error("Malformed day tree for {day}: {reason}")]
    MalformedDay { day: String, reason: String },

    #[error("Malformed week: {0}")]
    MalformedWeek(String),

    #[error("Food item {item_id} not found in {day} meal {meal_id}")]
    FoodItemNotFound {
        day: DayKey,
        meal_id: MealId,
        item_id: i64,
    },

    /// Meal times up to `saved` were durably written before the cascade stopped.
    #[error("Meal time cascade for {day} stopped at meal {failed} ({} earlier meal time(s) saved): {reason}", .saved.len())]
    CascadeInterrupted {
        day: DayKey,
        saved: Vec<MealId>,
        failed: MealId,
        reason: String,
    },

    #[error(transparent)]
    Storage(#[from] DbError),
}

pub type PlanResult<T> = Result<T, PlanError>;
