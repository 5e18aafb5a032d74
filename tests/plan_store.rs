//! Planner store integration tests against a real SQLite file

use std::cell::Cell;
use std::time::Instant;

use macroplan::context::PlanContext;
use macroplan::db::{Database, DbError, PlanStore};
use macroplan::models::{
    DailyMacroConfig, DayKey, DayPlan, FoodItem, MealId, MealTime, Nutrients, Settings, UnitSystem,
};
use macroplan::nutrition::RebasePolicy;
use macroplan::report::Tier;
use macroplan::schedule::{apply_cascade, set_meal_time};
use macroplan::{PlanError, PlanResult};
use tempfile::TempDir;

fn open_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db = Database::open_migrated(dir.path().join("macroplan.db")).unwrap();
    (dir, db)
}

fn id(n: i64) -> MealId {
    MealId::new(n).unwrap()
}

fn t(s: &str) -> MealTime {
    MealTime::parse(s).unwrap()
}

fn times(plan: &DayPlan) -> Vec<String> {
    plan.meals.iter().map(|m| m.time.to_string()).collect()
}

fn kcal(calories: f64) -> Nutrients {
    Nutrients {
        calories: Some(calories),
        ..Nutrients::none()
    }
}

#[test]
fn test_settings_default_then_round_trip() {
    let (_dir, db) = open_db();

    assert_eq!(db.get_settings().unwrap(), Settings::default());

    let settings = Settings {
        weight: 82.5,
        base_goal_calories: 2400.0,
        meal_interval: 2.5,
        unit_system: UnitSystem::Imperial,
    };
    db.save_settings(&settings).unwrap();
    assert_eq!(db.get_settings().unwrap(), settings);
}

#[test]
fn test_settings_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("macroplan.db");

    {
        let db = Database::open_migrated(&path).unwrap();
        let mut settings = Settings::default();
        settings.base_goal_calories = 1800.0;
        db.save_settings(&settings).unwrap();
    }

    let db = Database::open_migrated(&path).unwrap();
    assert_eq!(db.get_settings().unwrap().base_goal_calories, 1800.0);
}

#[test]
fn test_empty_day_has_six_default_meals() {
    let (_dir, db) = open_db();

    let plan = db.get_daily_meal_plan(DayKey::Monday).unwrap();
    assert_eq!(plan.meals.len(), 6);
    assert_eq!(times(&plan), ["08:00", "11:00", "14:00", "17:00", "20:00", "23:00"]);
    assert_eq!(plan.macro_config, DailyMacroConfig::default());
    plan.validate().unwrap();
}

#[test]
fn test_partial_day_is_synthesized() {
    let (_dir, db) = open_db();

    db.save_meal_time(DayKey::Tuesday, id(1), t("07:15")).unwrap();
    db.save_meal_time(DayKey::Tuesday, id(3), t("12:40")).unwrap();
    db.save_meal_time(DayKey::Tuesday, id(5), t("19:05")).unwrap();

    let plan = db.get_daily_meal_plan(DayKey::Tuesday).unwrap();
    assert_eq!(times(&plan), ["07:15", "11:00", "12:40", "17:00", "19:05", "23:00"]);
    let ids: Vec<u8> = plan.meals.iter().map(|m| m.id.get()).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_days_are_isolated() {
    let (_dir, db) = open_db();

    db.save_meal_time(DayKey::Friday, id(2), t("10:00")).unwrap();
    let cfg = DailyMacroConfig {
        protein_level: Some(2.0),
        fat_level: None,
        calorie_adjustment: 300,
    };
    db.save_macro_config(DayKey::Friday, &cfg).unwrap();

    let friday = db.get_daily_meal_plan(DayKey::Friday).unwrap();
    let saturday = db.get_daily_meal_plan(DayKey::Saturday).unwrap();
    assert_eq!(friday.macro_config, cfg);
    assert_eq!(friday.meals[1].time, t("10:00"));
    assert_eq!(saturday.macro_config, DailyMacroConfig::default());
    assert_eq!(saturday.meals[1].time, t("11:00"));
}

#[test]
fn test_food_item_lifecycle() {
    let (_dir, db) = open_db();
    let day = DayKey::Wednesday;

    let oats = FoodItem::new("Oats", 40.0, kcal(150.0)).unwrap();
    let oats_id = db.upsert_food_item(day, id(1), &oats).unwrap();
    let eggs = FoodItem::new("Eggs", 100.0, kcal(155.0)).unwrap();
    db.upsert_food_item(day, id(1), &eggs).unwrap();

    let plan = db.get_daily_meal_plan(day).unwrap();
    let names: Vec<&str> = plan.meals[0].items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Oats", "Eggs"]);

    let stored = db.get_food_item(day, id(1), oats_id).unwrap();
    let doubled = stored.with_amount(80.0, RebasePolicy::RebaseOnEdit).unwrap();
    assert_eq!(doubled.id, Some(oats_id));
    assert_eq!(db.upsert_food_item(day, id(1), &doubled).unwrap(), oats_id);

    let reloaded = db.get_food_item(day, id(1), oats_id).unwrap();
    assert_eq!(reloaded.amount, 80.0);
    assert_eq!(reloaded.base_amount, 80.0);
    assert_eq!(reloaded.nutrients.calories, Some(300.0));

    assert!(db.delete_food_item(day, id(1), oats_id).unwrap());
    assert!(!db.delete_food_item(day, id(1), oats_id).unwrap());
    assert!(matches!(
        db.get_food_item(day, id(1), oats_id),
        Err(PlanError::FoodItemNotFound { .. })
    ));
}

#[test]
fn test_food_item_scoped_to_its_slot() {
    let (_dir, db) = open_db();

    let item = FoodItem::new("Rice", 100.0, kcal(130.0)).unwrap();
    let item_id = db.upsert_food_item(DayKey::Sunday, id(2), &item).unwrap();

    assert!(db.get_food_item(DayKey::Sunday, id(3), item_id).is_err());
    assert!(db.get_food_item(DayKey::Monday, id(2), item_id).is_err());
    assert!(!db.delete_food_item(DayKey::Monday, id(2), item_id).unwrap());
}

#[test]
fn test_cascade_persists_all_meals() {
    let (_dir, db) = open_db();

    let outcome = set_meal_time(&db, DayKey::Thursday, id(1), t("23:00"), 3.0, None).unwrap();
    assert_eq!(outcome.saved.len(), 6);

    let plan = db.get_daily_meal_plan(DayKey::Thursday).unwrap();
    assert_eq!(times(&plan), ["23:00", "02:00", "05:00", "08:00", "11:00", "14:00"]);
}

#[test]
fn test_non_anchor_meal_changes_alone() {
    let (_dir, db) = open_db();

    let outcome = set_meal_time(&db, DayKey::Thursday, id(4), t("16:30"), 3.0, None).unwrap();
    assert_eq!(outcome.saved, vec![(id(4), t("16:30"))]);

    let plan = db.get_daily_meal_plan(DayKey::Thursday).unwrap();
    assert_eq!(times(&plan), ["08:00", "11:00", "14:00", "16:30", "20:00", "23:00"]);
}

/// Delegates to a real database but refuses to save one meal's time
struct FailingStore<'a> {
    inner: &'a Database,
    fail_on: MealId,
    writes: Cell<usize>,
}

impl PlanStore for FailingStore<'_> {
    fn get_settings(&self) -> PlanResult<Settings> {
        self.inner.get_settings()
    }

    fn save_settings(&self, settings: &Settings) -> PlanResult<()> {
        self.inner.save_settings(settings)
    }

    fn get_daily_meal_plan(&self, day: DayKey) -> PlanResult<DayPlan> {
        self.inner.get_daily_meal_plan(day)
    }

    fn save_macro_config(&self, day: DayKey, config: &DailyMacroConfig) -> PlanResult<()> {
        self.inner.save_macro_config(day, config)
    }

    fn save_meal_time(&self, day: DayKey, meal_id: MealId, time: MealTime) -> PlanResult<()> {
        if meal_id == self.fail_on {
            return Err(DbError::InvalidRow("disk full".to_string()).into());
        }
        self.writes.set(self.writes.get() + 1);
        self.inner.save_meal_time(day, meal_id, time)
    }

    fn upsert_food_item(&self, day: DayKey, meal_id: MealId, item: &FoodItem) -> PlanResult<i64> {
        self.inner.upsert_food_item(day, meal_id, item)
    }

    fn delete_food_item(&self, day: DayKey, meal_id: MealId, item_id: i64) -> PlanResult<bool> {
        self.inner.delete_food_item(day, meal_id, item_id)
    }
}

#[test]
fn test_interrupted_cascade_leaves_saved_prefix() {
    let (_dir, db) = open_db();
    let store = FailingStore {
        inner: &db,
        fail_on: id(4),
        writes: Cell::new(0),
    };

    let err = apply_cascade(&store, DayKey::Sunday, t("06:00"), 2.0, None).unwrap_err();
    match err {
        PlanError::CascadeInterrupted { saved, failed, .. } => {
            assert_eq!(saved, vec![id(1), id(2), id(3)]);
            assert_eq!(failed, id(4));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.writes.get(), 3);

    // Meals 1-3 moved, 4-6 kept their previous times
    let plan = db.get_daily_meal_plan(DayKey::Sunday).unwrap();
    assert_eq!(times(&plan), ["06:00", "08:00", "10:00", "17:00", "20:00", "23:00"]);
}

#[test]
fn test_expired_deadline_writes_nothing() {
    let (_dir, db) = open_db();

    let err = apply_cascade(&db, DayKey::Monday, t("05:00"), 3.0, Some(Instant::now())).unwrap_err();
    match err {
        PlanError::CascadeInterrupted { saved, failed, .. } => {
            assert!(saved.is_empty());
            assert_eq!(failed, MealId::FIRST);
        }
        other => panic!("unexpected error: {other}"),
    }

    let plan = db.get_daily_meal_plan(DayKey::Monday).unwrap();
    assert_eq!(plan.meals[0].time, t("08:00"));
}

#[test]
fn test_day_report_from_store() {
    let (_dir, db) = open_db();
    let day = DayKey::Saturday;

    db.save_macro_config(
        day,
        &DailyMacroConfig {
            protein_level: Some(2.0),
            fat_level: Some(1.0),
            calorie_adjustment: 0,
        },
    )
    .unwrap();

    let lunch = FoodItem::new(
        "Chicken bowl",
        500.0,
        Nutrients {
            calories: Some(2000.0),
            carbs: Some(255.0),
            protein: Some(100.0),
            fat: Some(70.0),
            protein_g: Some(40.0),
        },
    )
    .unwrap();
    db.upsert_food_item(day, id(3), &lunch).unwrap();

    let ctx = PlanContext::load(&db).unwrap();
    let report = ctx.day_report(&db, day).unwrap();

    assert_eq!(report.targets.protein_target, 140.0);
    assert_eq!(report.targets.fat_target, 70.0);
    // (2000 - 140*4 - 70*9) / 4
    assert_eq!(report.targets.carb_target, 202.5);
    assert_eq!(report.totals.protein_total(), 140.0);
    assert_eq!(report.calorie_achievement, 100.0);
}

fn insert_raw_meal(db: &Database, day: &str, meal_id: i64, time: &str) {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO meals (day_key, meal_id, time) VALUES (?1, ?2, ?3)",
            rusqlite::params![day, meal_id, time],
        )?;
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_week_report_refuses_out_of_range_meal_id() {
    let (_dir, db) = open_db();
    insert_raw_meal(&db, "wednesday", 7, "09:00");

    assert!(matches!(
        db.get_daily_meal_plan(DayKey::Wednesday),
        Err(PlanError::MalformedDay { .. })
    ));

    let ctx = PlanContext::load(&db).unwrap();
    assert!(matches!(ctx.week_report(&db), Err(PlanError::MalformedDay { .. })));
}

#[test]
fn test_week_report_refuses_unparsable_time() {
    let (_dir, db) = open_db();
    insert_raw_meal(&db, "friday", 2, "lunch");

    let ctx = PlanContext::load(&db).unwrap();
    match ctx.week_report(&db) {
        Err(PlanError::MalformedDay { day, reason }) => {
            assert_eq!(day, "friday");
            assert!(reason.contains("lunch"), "{reason}");
        }
        other => panic!("expected malformed day, got {other:?}"),
    }
}

#[test]
fn test_week_report_from_store() {
    let (_dir, db) = open_db();

    for (day, calories) in [
        (DayKey::Sunday, 2000.0),
        (DayKey::Monday, 1950.0),
        (DayKey::Tuesday, 2300.0),
    ] {
        let item = FoodItem::new("Day total", 100.0, kcal(calories)).unwrap();
        db.upsert_food_item(day, id(1), &item).unwrap();
    }

    let ctx = PlanContext::load(&db).unwrap();
    let week = ctx.week_report(&db).unwrap();

    let order: Vec<DayKey> = week.days.iter().map(|d| d.day).collect();
    assert_eq!(order, DayKey::ALL);
    assert_eq!(week.summary.days_on_track, 2);
    assert_eq!(week.summary.avg_goal_calories, 2000.0);
    // 6250 / 7
    assert!((week.summary.avg_daily_calories - 892.857).abs() < 0.01);
    assert_eq!(week.days[2].status, Tier::NeedsImprovement);
}
