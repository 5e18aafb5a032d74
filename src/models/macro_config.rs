//! Daily macro configuration
//!
//! Per-weekday protein/fat levels (g per kg body weight) and calorie
//! adjustment applied on top of the base goal.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::DayKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyMacroConfig {
    /// Protein grams per kg body weight
    pub protein_level: Option<f64>,
    /// Fat grams per kg body weight
    pub fat_level: Option<f64>,
    #[serde(default)]
    pub calorie_adjustment: i64,
}

impl DailyMacroConfig {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            protein_level: row.get("protein_level")?,
            fat_level: row.get("fat_level")?,
            calorie_adjustment: row.get("calorie_adjustment")?,
        })
    }

    /// Config for a day; days never configured get the empty default
    pub fn get_for_day(conn: &Connection, day: DayKey) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT * FROM macro_configs WHERE day_key = ?1")?;

        match stmt.query_row([day.as_str()], Self::from_row) {
            Ok(config) => Ok(config),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(conn: &Connection, day: DayKey, config: &DailyMacroConfig) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO macro_configs (day_key, protein_level, fat_level, calorie_adjustment)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(day_key) DO UPDATE SET
                protein_level = excluded.protein_level,
                fat_level = excluded.fat_level,
                calorie_adjustment = excluded.calorie_adjustment,
                updated_at = datetime('now')
            "#,
            params![
                day.as_str(),
                config.protein_level,
                config.fat_level,
                config.calorie_adjustment,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_unconfigured_day_is_empty() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let config = DailyMacroConfig::get_for_day(&conn, DayKey::Friday).unwrap();
        assert_eq!(config.protein_level, None);
        assert_eq!(config.fat_level, None);
        assert_eq!(config.calorie_adjustment, 0);
    }

    #[test]
    fn test_save_is_per_day() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let config = DailyMacroConfig {
            protein_level: Some(2.0),
            fat_level: None,
            calorie_adjustment: -300,
        };
        DailyMacroConfig::save(&conn, DayKey::Monday, &config).unwrap();

        assert_eq!(DailyMacroConfig::get_for_day(&conn, DayKey::Monday).unwrap(), config);
        assert_eq!(
            DailyMacroConfig::get_for_day(&conn, DayKey::Tuesday).unwrap(),
            DailyMacroConfig::default()
        );
    }
}
