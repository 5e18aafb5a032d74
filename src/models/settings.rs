//! Settings model
//!
//! Process-wide profile: body weight, calorie goal, meal interval, units.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const DEFAULT_GOAL_CALORIES: f64 = 2000.0;
pub const DEFAULT_MEAL_INTERVAL_HOURS: f64 = 3.0;

/// Unit system used for displaying and entering weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "g" | "kg" => Some(UnitSystem::Metric),
            "imperial" | "lb" | "lbs" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }
}

/// Planner settings (single row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Body weight, always kilograms
    pub weight: f64,
    pub base_goal_calories: f64,
    /// Hours between consecutive meals
    pub meal_interval: f64,
    pub unit_system: UnitSystem,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT_KG,
            base_goal_calories: DEFAULT_GOAL_CALORIES,
            meal_interval: DEFAULT_MEAL_INTERVAL_HOURS,
            unit_system: UnitSystem::Metric,
        }
    }
}

/// Partial update for settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub weight: Option<f64>,
    pub base_goal_calories: Option<f64>,
    pub meal_interval: Option<f64>,
    pub unit_system: Option<UnitSystem>,
}

impl Settings {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit: String = row.get("unit_system")?;
        Ok(Self {
            weight: row.get("weight_kg")?,
            base_goal_calories: row.get("base_goal_calories")?,
            meal_interval: row.get("meal_interval_hours")?,
            unit_system: UnitSystem::from_str(&unit).unwrap_or_default(),
        })
    }

    /// Load settings, falling back to defaults when none were saved
    pub fn get(conn: &Connection) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT * FROM settings WHERE id = 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(settings) => Ok(settings),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or replace settings (upsert)
    pub fn save(conn: &Connection, settings: &Settings) -> DbResult<()> {
        if !(settings.weight.is_finite() && settings.weight >= 0.0) {
            return Err(DbError::InvalidRow(format!("weight {}", settings.weight)));
        }
        conn.execute(
            r#"
            INSERT INTO settings (id, weight_kg, base_goal_calories, meal_interval_hours, unit_system)
            VALUES (1, ?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                base_goal_calories = excluded.base_goal_calories,
                meal_interval_hours = excluded.meal_interval_hours,
                unit_system = excluded.unit_system,
                updated_at = datetime('now')
            "#,
            params![
                settings.weight,
                settings.base_goal_calories,
                settings.meal_interval,
                settings.unit_system.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Apply a partial update on top of these settings
    pub fn merged(&self, update: &SettingsUpdate) -> Self {
        Self {
            weight: update.weight.unwrap_or(self.weight),
            base_goal_calories: update.base_goal_calories.unwrap_or(self.base_goal_calories),
            meal_interval: update.meal_interval.unwrap_or(self.meal_interval),
            unit_system: update.unit_system.unwrap_or(self.unit_system),
        }
    }
}
