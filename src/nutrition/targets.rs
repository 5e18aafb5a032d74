//! Macro target calculation
//!
//! Protein and fat targets come from body weight times the day's g/kg
//! levels; carbohydrates fill whatever calories remain.

use serde::Serialize;

use crate::models::{DailyMacroConfig, Settings};

/// Atwater factors, kcal per gram
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Absolute targets for one day. A zero target means "no target set".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayTargets {
    pub goal_calories: f64,
    /// grams
    pub protein_target: f64,
    /// grams
    pub fat_target: f64,
    /// grams
    pub carb_target: f64,
}

pub fn compute_targets(settings: &Settings, config: &DailyMacroConfig) -> DayTargets {
    let goal_calories = settings.base_goal_calories + config.calorie_adjustment as f64;

    let protein_target = settings.weight * config.protein_level.unwrap_or(0.0);
    let fat_target = settings.weight * config.fat_level.unwrap_or(0.0);

    let protein_calories = protein_target * KCAL_PER_G_PROTEIN;
    let fat_calories = fat_target * KCAL_PER_G_FAT;
    let remaining_calories = (goal_calories - protein_calories - fat_calories).max(0.0);

    DayTargets {
        goal_calories,
        protein_target,
        fat_target,
        carb_target: remaining_calories / KCAL_PER_G_CARBS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitSystem;

    fn settings(weight: f64, goal: f64) -> Settings {
        Settings {
            weight,
            base_goal_calories: goal,
            meal_interval: 3.0,
            unit_system: UnitSystem::Metric,
        }
    }

    fn config(protein: Option<f64>, fat: Option<f64>, adjustment: i64) -> DailyMacroConfig {
        DailyMacroConfig {
            protein_level: protein,
            fat_level: fat,
            calorie_adjustment: adjustment,
        }
    }

    #[test]
    fn test_targets_from_levels() {
        let targets = compute_targets(&settings(80.0, 2500.0), &config(Some(2.0), Some(1.0), -200));
        assert_eq!(targets.goal_calories, 2300.0);
        assert_eq!(targets.protein_target, 160.0);
        assert_eq!(targets.fat_target, 80.0);
        // 2300 - 640 - 720 = 940 kcal of carbs
        assert!((targets.carb_target - 235.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_levels_give_zero_targets() {
        let targets = compute_targets(&settings(80.0, 2000.0), &DailyMacroConfig::default());
        assert_eq!(targets.protein_target, 0.0);
        assert_eq!(targets.fat_target, 0.0);
        assert_eq!(targets.carb_target, 500.0);
    }

    #[test]
    fn test_targets_increase_with_weight() {
        let levels = config(Some(1.8), Some(0.9), 0);
        let light = compute_targets(&settings(60.0, 2200.0), &levels);
        let heavy = compute_targets(&settings(61.0, 2200.0), &levels);
        assert!(heavy.protein_target > light.protein_target);
        assert!(heavy.fat_target > light.fat_target);
    }

    #[test]
    fn test_carb_target_never_negative() {
        let weights = [40.0, 70.0, 120.0, 200.0];
        let goals = [0.0, 1200.0, 3000.0];
        let adjustments = [-5000, -500, 0, 500];
        for weight in weights {
            for goal in goals {
                for adjustment in adjustments {
                    let targets = compute_targets(
                        &settings(weight, goal),
                        &config(Some(3.0), Some(2.0), adjustment),
                    );
                    assert!(targets.carb_target >= 0.0);
                }
            }
        }
    }
}
