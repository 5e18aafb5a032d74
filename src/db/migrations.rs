//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- SETTINGS
        -- Process-wide profile, single row
        -- ============================================
        CREATE TABLE settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            weight_kg REAL NOT NULL,
            base_goal_calories REAL NOT NULL,
            meal_interval_hours REAL NOT NULL DEFAULT 3.0,
            unit_system TEXT NOT NULL CHECK(unit_system IN ('metric', 'imperial')) DEFAULT 'metric',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- MACRO CONFIGS
        -- Per-weekday macro levels (g/kg) and calorie adjustment
        -- ============================================
        CREATE TABLE macro_configs (
            day_key TEXT PRIMARY KEY CHECK(day_key IN
                ('sunday', 'monday', 'tuesday', 'wednesday', 'thursday', 'friday', 'saturday')),
            protein_level REAL,                  -- g/kg, nullable
            fat_level REAL,                      -- g/kg, nullable
            calorie_adjustment INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- MEALS
        -- Serving time per meal slot; missing rows use default times
        -- ============================================
        CREATE TABLE meals (
            day_key TEXT NOT NULL,
            meal_id INTEGER NOT NULL,
            time TEXT NOT NULL,                  -- "HH:MM", 24h
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (day_key, meal_id)
        );

        -- ============================================
        -- FOOD ITEMS
        -- Foods attached to a meal slot. Current values are derived from
        -- the base values at base_amount; NULL means "no value".
        -- ============================================
        CREATE TABLE food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            day_key TEXT NOT NULL,
            meal_id INTEGER NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL,
            amount REAL NOT NULL DEFAULT 0,
            base_amount REAL NOT NULL DEFAULT 0,

            calories REAL,
            carbs REAL,
            protein REAL,
            fat REAL,
            protein_g REAL,

            base_calories REAL,
            base_carbs REAL,
            base_protein REAL,
            base_fat REAL,
            base_protein_g REAL,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_items_slot ON food_items(day_key, meal_id, position);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
