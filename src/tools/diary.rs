//! Diary Tools
//!
//! Day plans, macro configuration, food items and meal times.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::context::PlanContext;
use crate::db::{Database, PlanStore};
use crate::models::{DailyMacroConfig, DayKey, DayPlan, FoodItem, MealId, MealTime, Nutrients, UnitSystem};
use crate::nutrition::units::{amount_from_grams, amount_to_grams, amount_unit};
use crate::nutrition::{round1, round_calories};
use crate::schedule::{set_meal_time as schedule_meal_time, CascadeOutcome};

/// Upper bound on how long a cascade may keep issuing writes
const CASCADE_TIMEOUT: Duration = Duration::from_secs(10);

/// Nutrient values rounded for display; blank stays blank
#[derive(Debug, Serialize)]
pub struct NutrientsView {
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub protein_g: Option<f64>,
}

impl From<&Nutrients> for NutrientsView {
    fn from(n: &Nutrients) -> Self {
        Self {
            calories: n.calories.map(round_calories),
            carbs: n.carbs.map(round1),
            protein: n.protein.map(round1),
            fat: n.fat.map(round1),
            protein_g: n.protein_g.map(round1),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FoodItemView {
    pub id: Option<i64>,
    pub name: String,
    pub amount: f64,
    pub base_amount: f64,
    pub unit: &'static str,
    pub nutrients: NutrientsView,
}

impl FoodItemView {
    fn new(item: &FoodItem, units: UnitSystem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            amount: round1(amount_from_grams(item.amount, units)),
            base_amount: round1(amount_from_grams(item.base_amount, units)),
            unit: amount_unit(units),
            nutrients: NutrientsView::from(&item.nutrients),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealView {
    pub id: MealId,
    pub time: MealTime,
    pub items: Vec<FoodItemView>,
}

#[derive(Debug, Serialize)]
pub struct DayPlanResponse {
    pub day: DayKey,
    pub macro_config: DailyMacroConfig,
    pub meals: Vec<MealView>,
}

impl DayPlanResponse {
    fn new(plan: &DayPlan, units: UnitSystem) -> Self {
        Self {
            day: plan.day,
            macro_config: plan.macro_config,
            meals: plan
                .meals
                .iter()
                .map(|meal| MealView {
                    id: meal.id,
                    time: meal.time,
                    items: meal.items.iter().map(|i| FoodItemView::new(i, units)).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FoodItemResponse {
    pub day: DayKey,
    pub meal_id: MealId,
    pub item: FoodItemView,
    pub rebased: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteFoodItemResponse {
    pub success: bool,
    pub deleted_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MealTimesResponse {
    pub day: DayKey,
    pub saved: Vec<MealTimeView>,
}

#[derive(Debug, Serialize)]
pub struct MealTimeView {
    pub meal_id: MealId,
    pub time: MealTime,
}

impl From<CascadeOutcome> for MealTimesResponse {
    fn from(outcome: CascadeOutcome) -> Self {
        Self {
            day: outcome.day,
            saved: outcome
                .saved
                .into_iter()
                .map(|(meal_id, time)| MealTimeView { meal_id, time })
                .collect(),
        }
    }
}

fn parse_day(day: &str) -> Result<DayKey, String> {
    DayKey::parse(day).map_err(|e| e.to_string())
}

fn parse_meal(meal_id: i64) -> Result<MealId, String> {
    MealId::new(meal_id).map_err(|e| e.to_string())
}

// ============================================================================
// Day Tools
// ============================================================================

pub fn get_day_plan(db: &Database, day: &str) -> Result<DayPlanResponse, String> {
    let day = parse_day(day)?;
    let ctx = PlanContext::load(db).map_err(|e| format!("Failed to load settings: {}", e))?;
    let plan = db
        .get_daily_meal_plan(day)
        .map_err(|e| format!("Failed to load {}: {}", day, e))?;
    Ok(DayPlanResponse::new(&plan, ctx.settings.unit_system))
}

pub fn set_macro_config(
    db: &Database,
    day: &str,
    protein_level: Option<f64>,
    fat_level: Option<f64>,
    calorie_adjustment: Option<i64>,
) -> Result<DailyMacroConfig, String> {
    let day = parse_day(day)?;
    for (name, level) in [("protein_level", protein_level), ("fat_level", fat_level)] {
        if let Some(v) = level {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
        }
    }

    let config = DailyMacroConfig {
        protein_level,
        fat_level,
        calorie_adjustment: calorie_adjustment.unwrap_or(0),
    };
    db.save_macro_config(day, &config)
        .map_err(|e| format!("Failed to save macro config: {}", e))?;
    Ok(config)
}

// ============================================================================
// Food Item Tools
// ============================================================================

/// Attach a food to a meal at its reference serving. Amounts are in the
/// active unit system (g or lb).
pub fn add_food_item(
    db: &Database,
    day: &str,
    meal_id: i64,
    name: &str,
    base_amount: f64,
    base: Nutrients,
) -> Result<FoodItemResponse, String> {
    let day = parse_day(day)?;
    let meal_id = parse_meal(meal_id)?;
    let name = name.trim();
    if name.is_empty() {
        return Err("Food item name cannot be empty".to_string());
    }

    let ctx = PlanContext::load(db).map_err(|e| format!("Failed to load settings: {}", e))?;
    let units = ctx.settings.unit_system;

    let mut item = FoodItem::new(name, amount_to_grams(base_amount, units), base)
        .map_err(|e| e.to_string())?;
    let id = db
        .upsert_food_item(day, meal_id, &item)
        .map_err(|e| format!("Failed to add food item: {}", e))?;
    item.id = Some(id);

    Ok(FoodItemResponse {
        day,
        meal_id,
        item: FoodItemView::new(&item, units),
        rebased: false,
    })
}

/// Change a food item's serving amount and recompute its values
pub fn update_food_amount(
    db: &Database,
    day: &str,
    meal_id: i64,
    item_id: i64,
    amount: f64,
) -> Result<FoodItemResponse, String> {
    let day = parse_day(day)?;
    let meal_id = parse_meal(meal_id)?;
    let ctx = PlanContext::load(db).map_err(|e| format!("Failed to load settings: {}", e))?;
    let units = ctx.settings.unit_system;

    let item = db
        .get_food_item(day, meal_id, item_id)
        .map_err(|e| e.to_string())?;
    let updated = item
        .with_amount(amount_to_grams(amount, units), ctx.rebase_policy)
        .map_err(|e| e.to_string())?;

    db.upsert_food_item(day, meal_id, &updated)
        .map_err(|e| format!("Failed to save food item: {}", e))?;

    Ok(FoodItemResponse {
        day,
        meal_id,
        rebased: updated.base_amount != item.base_amount,
        item: FoodItemView::new(&updated, units),
    })
}

/// Rename a food item. An empty name removes the item from the meal.
pub fn rename_food_item(
    db: &Database,
    day: &str,
    meal_id: i64,
    item_id: i64,
    name: &str,
) -> Result<Option<FoodItemResponse>, String> {
    let name = name.trim();
    if name.is_empty() {
        delete_food_item(db, day, meal_id, item_id)?;
        return Ok(None);
    }

    let day = parse_day(day)?;
    let meal_id = parse_meal(meal_id)?;
    let ctx = PlanContext::load(db).map_err(|e| format!("Failed to load settings: {}", e))?;

    let mut item = db
        .get_food_item(day, meal_id, item_id)
        .map_err(|e| e.to_string())?;
    item.name = name.to_string();
    db.upsert_food_item(day, meal_id, &item)
        .map_err(|e| format!("Failed to save food item: {}", e))?;

    Ok(Some(FoodItemResponse {
        day,
        meal_id,
        item: FoodItemView::new(&item, ctx.settings.unit_system),
        rebased: false,
    }))
}

pub fn delete_food_item(
    db: &Database,
    day: &str,
    meal_id: i64,
    item_id: i64,
) -> Result<DeleteFoodItemResponse, String> {
    let day = parse_day(day)?;
    let meal_id = parse_meal(meal_id)?;

    let deleted = db
        .delete_food_item(day, meal_id, item_id)
        .map_err(|e| format!("Failed to delete food item: {}", e))?;
    if !deleted {
        return Err(format!(
            "Food item {} not found in {} meal {}",
            item_id, day, meal_id
        ));
    }

    Ok(DeleteFoodItemResponse {
        success: true,
        deleted_id: item_id,
    })
}

// ============================================================================
// Meal Time Tools
// ============================================================================

/// Set a meal's time. Meal 1 reschedules meals 2-6 using the configured
/// interval; on a failed write the error lists the meals already saved.
pub fn set_meal_time(db: &Database, day: &str, meal_id: i64, time: &str) -> Result<MealTimesResponse, String> {
    let day = parse_day(day)?;
    let meal_id = parse_meal(meal_id)?;
    let time = MealTime::parse(time).map_err(|e| e.to_string())?;
    let ctx = PlanContext::load(db).map_err(|e| format!("Failed to load settings: {}", e))?;

    let outcome = schedule_meal_time(
        db,
        day,
        meal_id,
        time,
        ctx.settings.meal_interval,
        Some(Instant::now() + CASCADE_TIMEOUT),
    )
    .map_err(|e| format!("{}. Reload the day to see the saved times.", e))?;

    Ok(MealTimesResponse::from(outcome))
}
