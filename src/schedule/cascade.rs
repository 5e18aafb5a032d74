//! Meal time cascade
//!
//! Meal 1's time anchors the day: meal k is served `(k - 1) * interval`
//! hours later, wrapping past midnight.

use std::time::Instant;

use serde::Serialize;

use crate::db::PlanStore;
use crate::error::{PlanError, PlanResult};
use crate::models::{DayKey, MealId, MealTime};

const MINUTES_PER_DAY: f64 = 1440.0;

/// Interval must be a finite, non-negative number of hours
pub fn validate_interval(hours: f64) -> PlanResult<f64> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(hours)
    } else {
        Err(PlanError::InvalidInterval(hours))
    }
}

/// Time for `meal` given the anchor (meal 1) time.
///
/// The modulo is taken on the unrounded total so fractional intervals do not
/// accumulate truncation error; the result is then rounded to the nearest
/// minute (23:59.6 rounds up to 00:00).
pub fn cascade_time(anchor: MealTime, interval_hours: f64, meal: MealId) -> MealTime {
    let offset = f64::from(meal.get() - 1) * interval_hours * 60.0;
    let total = (f64::from(anchor.minutes()) + offset).rem_euclid(MINUTES_PER_DAY);
    MealTime::from_minutes(total.round() as u32)
}

/// Times for meals 2-6; meal 1 keeps the anchor
pub fn cascade(anchor: MealTime, interval_hours: f64) -> PlanResult<Vec<(MealId, MealTime)>> {
    let interval_hours = validate_interval(interval_hours)?;
    Ok(MealId::all()
        .skip(1)
        .map(|id| (id, cascade_time(anchor, interval_hours, id)))
        .collect())
}

/// Meal times that were durably saved, in the order they were written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeOutcome {
    pub day: DayKey,
    pub saved: Vec<(MealId, MealTime)>,
}

/// Save meal 1's new time, then each dependent meal in id order.
///
/// Writes are sequential so an interruption leaves a prefix of updated
/// meals. Nothing already written is rolled back; past `deadline` no further
/// writes are issued.
pub fn apply_cascade<S>(
    store: &S,
    day: DayKey,
    anchor: MealTime,
    interval_hours: f64,
    deadline: Option<Instant>,
) -> PlanResult<CascadeOutcome>
where
    S: PlanStore + ?Sized,
{
    let dependents = cascade(anchor, interval_hours)?;

    tracing::info!(
        "Cascading meal times for {} from {} every {}h",
        day,
        anchor,
        interval_hours
    );

    let mut saved = Vec::with_capacity(dependents.len() + 1);
    let writes = std::iter::once((MealId::FIRST, anchor)).chain(dependents);

    for (meal_id, time) in writes {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::warn!("Meal time cascade for {} cancelled before meal {}", day, meal_id);
            return Err(PlanError::CascadeInterrupted {
                day,
                saved: saved.iter().map(|(id, _)| *id).collect(),
                failed: meal_id,
                reason: "deadline passed".to_string(),
            });
        }

        if let Err(e) = store.save_meal_time(day, meal_id, time) {
            tracing::warn!("Failed to save {} meal {} time: {}", day, meal_id, e);
            return Err(PlanError::CascadeInterrupted {
                day,
                saved: saved.iter().map(|(id, _)| *id).collect(),
                failed: meal_id,
                reason: e.to_string(),
            });
        }
        saved.push((meal_id, time));
    }

    tracing::info!("Saved {} meal times for {}", saved.len(), day);
    Ok(CascadeOutcome { day, saved })
}

/// Edit a single meal's time. Meal 1 cascades to the rest of the day; any
/// other meal changes alone.
pub fn set_meal_time<S>(
    store: &S,
    day: DayKey,
    meal_id: MealId,
    time: MealTime,
    interval_hours: f64,
    deadline: Option<Instant>,
) -> PlanResult<CascadeOutcome>
where
    S: PlanStore + ?Sized,
{
    if meal_id == MealId::FIRST {
        return apply_cascade(store, day, time, interval_hours, deadline);
    }

    store.save_meal_time(day, meal_id, time)?;
    Ok(CascadeOutcome {
        day,
        saved: vec![(meal_id, time)],
    })
}
