//! Status Tool
//!
//! Runtime status of the planner service and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::migrations::get_schema_version;
use crate::db::Database;

/// Usage guide for assistants driving the planner tools
pub const PLANNER_INSTRUCTIONS: &str = r#"
# Macro Planner Instructions

The planner keeps one weekly template: seven days (sunday..saturday), each
with exactly six meals. Meals you never touched sit at their default times
(08:00, 11:00, 14:00, 17:00, 20:00, 23:00).

## 1. Settings

`get_settings` / `update_settings`
- weight: body weight in the active unit system (kg or lb)
- base_goal_calories: daily calorie goal before per-day adjustment
- meal_interval: hours between meals (default 3)
- unit_system: "metric" (g, kg) or "imperial" (lb)

## 2. Daily macro levels

`set_macro_config` with day, protein_level and fat_level in grams per kg of
body weight, plus calorie_adjustment (kcal, may be negative).
- protein target = weight x protein_level
- fat target = weight x fat_level
- carbs fill the calories left after protein (4 kcal/g) and fat (9 kcal/g)
Leaving a level empty means "no target" for that macro.

## 3. Logging food

`add_food_item` with day, meal_id (1-6), name, base_amount and the nutrient
values at that amount. `update_food_amount` rescales all values linearly.
Items with a zero base amount have no values (shown blank, not zero).
`rename_food_item` with an empty name removes the item.

## 4. Meal times

`set_meal_time` on meal 1 reschedules meals 2-6 at meal_interval spacing,
wrapping past midnight. Other meals can be moved one at a time. If a save
fails midway, the meals before it keep their new times: reload with
`get_day_plan`.

## 5. Reports

`get_day_report` and `get_week_report`. Tiers: excellent 95-105% of target,
good 90-110%, otherwise needs-improvement. A day is on track when calories
are within 95-105% of the goal.
"#;

#[derive(Debug, Clone, Serialize)]
pub struct PlannerStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    /// `None` when the database could not be queried
    pub schema_version: Option<i32>,
    /// Food items logged across the week
    pub planned_food_items: Option<i64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information for the status tool
pub struct StatusTracker {
    started: Instant,
    database_path: PathBuf,
    database: Option<Database>,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            started: Instant::now(),
            database_path,
            database: None,
        }
    }

    /// Also report schema version and item counts from this database
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    fn database_stats(&self) -> (Option<i32>, Option<i64>) {
        let Some(db) = &self.database else {
            return (None, None);
        };
        let stats = db.with_conn(|conn| {
            let version = get_schema_version(conn)?;
            let items: i64 = conn.query_row("SELECT COUNT(*) FROM food_items", [], |row| row.get(0))?;
            Ok((version, items))
        });
        match stats {
            Ok((version, items)) => (Some(version), Some(items)),
            Err(e) => {
                tracing::warn!("Status query failed: {}", e);
                (None, None)
            }
        }
    }

    pub fn get_status(&self) -> PlannerStatus {
        let build = BuildInfo::current();
        let (schema_version, planned_food_items) = self.database_stats();

        let pid = Pid::from_u32(std::process::id());
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]));
        let memory_usage_bytes = sys.process(pid).map_or(0, |p| p.memory());

        PlannerStatus {
            build_number: build.build_number,
            build_timestamp: build.build_timestamp,
            version: build.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes: std::fs::metadata(&self.database_path).ok().map(|m| m.len()),
            schema_version,
            planned_food_items,
            uptime_seconds: self.started.elapsed().as_secs(),
            process_id: pid.as_u32(),
            memory_usage_bytes,
        }
    }
}
