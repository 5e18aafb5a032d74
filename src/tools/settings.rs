//! Settings Tools
//!
//! Read and update the planner profile. Body weight is shown and entered in
//! the active unit system but stored in kilograms.

use serde::Serialize;

use crate::db::{Database, PlanStore};
use crate::models::{Settings, SettingsUpdate, UnitSystem};
use crate::nutrition::round1;
use crate::nutrition::units::{weight_from_kg, weight_to_kg, weight_unit};
use crate::schedule::cascade::validate_interval;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub weight: f64,
    pub weight_unit: &'static str,
    pub weight_kg: f64,
    pub base_goal_calories: f64,
    pub meal_interval: f64,
    pub unit_system: UnitSystem,
}

impl From<&Settings> for SettingsResponse {
    fn from(settings: &Settings) -> Self {
        Self {
            weight: round1(weight_from_kg(settings.weight, settings.unit_system)),
            weight_unit: weight_unit(settings.unit_system),
            weight_kg: settings.weight,
            base_goal_calories: settings.base_goal_calories,
            meal_interval: settings.meal_interval,
            unit_system: settings.unit_system,
        }
    }
}

pub fn get_settings(db: &Database) -> Result<SettingsResponse, String> {
    let settings = db
        .get_settings()
        .map_err(|e| format!("Failed to load settings: {}", e))?;
    Ok(SettingsResponse::from(&settings))
}

/// Update settings. `weight` is interpreted in the unit system in effect
/// after the update.
pub fn update_settings(
    db: &Database,
    weight: Option<f64>,
    base_goal_calories: Option<f64>,
    meal_interval: Option<f64>,
    unit_system: Option<&str>,
) -> Result<SettingsResponse, String> {
    let unit_system = match unit_system {
        Some(s) => Some(
            UnitSystem::from_str(s)
                .ok_or_else(|| format!("Unknown unit system '{}' (use metric or imperial)", s))?,
        ),
        None => None,
    };

    if let Some(w) = weight {
        if !w.is_finite() || w <= 0.0 {
            return Err("weight must be greater than 0".to_string());
        }
    }
    if let Some(goal) = base_goal_calories {
        if !goal.is_finite() || goal < 0.0 {
            return Err("base_goal_calories cannot be negative".to_string());
        }
    }
    if let Some(interval) = meal_interval {
        validate_interval(interval).map_err(|e| e.to_string())?;
    }

    let current = db
        .get_settings()
        .map_err(|e| format!("Failed to load settings: {}", e))?;
    let units = unit_system.unwrap_or(current.unit_system);

    let updated = current.merged(&SettingsUpdate {
        weight: weight.map(|w| weight_to_kg(w, units)),
        base_goal_calories,
        meal_interval,
        unit_system,
    });

    db.save_settings(&updated)
        .map_err(|e| format!("Failed to save settings: {}", e))?;

    tracing::info!(
        "Settings updated: {:.1} kg, {} kcal, every {}h, {}",
        updated.weight,
        updated.base_goal_calories,
        updated.meal_interval,
        updated.unit_system.as_str()
    );

    Ok(SettingsResponse::from(&updated))
}
