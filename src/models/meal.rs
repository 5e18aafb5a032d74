//! Meal and day plan models
//!
//! A day always holds exactly six meal slots. Slots that were never saved
//! are synthesized with the default serving times.

use std::fmt;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::error::{PlanError, PlanResult};
use super::{DailyMacroConfig, DayKey, FoodItem};

/// Number of meal slots per day
pub const MEALS_PER_DAY: usize = 6;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Meal slot id, 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MealId(u8);

impl MealId {
    pub const FIRST: MealId = MealId(1);

    pub fn new(id: i64) -> PlanResult<Self> {
        if (1..=MEALS_PER_DAY as i64).contains(&id) {
            Ok(MealId(id as u8))
        } else {
            Err(PlanError::InvalidMealId(id))
        }
    }

    pub fn all() -> impl Iterator<Item = MealId> {
        (1..=MEALS_PER_DAY as u8).map(MealId)
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based slot position
    pub fn index(&self) -> usize {
        self.0 as usize - 1
    }

    /// Preset serving time: 08:00 for meal 1, then every three hours
    pub fn default_time(&self) -> MealTime {
        MealTime((8 + 3 * (self.0 as u16 - 1)) * 60)
    }
}

impl TryFrom<i64> for MealId {
    type Error = PlanError;

    fn try_from(id: i64) -> PlanResult<Self> {
        MealId::new(id)
    }
}

impl From<MealId> for i64 {
    fn from(id: MealId) -> i64 {
        id.0 as i64
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time of day with minute precision, rendered as zero-padded `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MealTime(u16);

impl MealTime {
    /// Build from minutes since midnight; wraps at 24h
    pub fn from_minutes(minutes: u32) -> Self {
        MealTime((minutes % MINUTES_PER_DAY as u32) as u16)
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn parse(s: &str) -> PlanResult<Self> {
        let invalid = || PlanError::InvalidTime(s.to_string());
        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        if !digits(hours) || !digits(minutes) {
            return Err(invalid());
        }
        let hours: u16 = hours.parse().map_err(|_| invalid())?;
        let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }
        Ok(MealTime(hours * 60 + minutes))
    }
}

impl TryFrom<String> for MealTime {
    type Error = PlanError;

    fn try_from(s: String) -> PlanResult<Self> {
        MealTime::parse(&s)
    }
}

impl From<MealTime> for String {
    fn from(time: MealTime) -> String {
        time.to_string()
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One meal slot and the foods attached to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: MealId,
    pub time: MealTime,
    #[serde(default)]
    pub items: Vec<FoodItem>,
}

impl Meal {
    /// Empty slot at its default time
    pub fn empty(id: MealId) -> Self {
        Self {
            id,
            time: id.default_time(),
            items: Vec::new(),
        }
    }

    /// Load the stored serving times for a day as raw (meal_id, time) rows
    pub fn stored_times(conn: &Connection, day: DayKey) -> DbResult<Vec<(i64, String)>> {
        let mut stmt = conn.prepare(
            "SELECT meal_id, time FROM meals WHERE day_key = ?1 ORDER BY meal_id",
        )?;
        let rows = stmt
            .query_map([day.as_str()], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn save_time(conn: &Connection, day: DayKey, id: MealId, time: MealTime) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO meals (day_key, meal_id, time)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(day_key, meal_id) DO UPDATE SET
                time = excluded.time,
                updated_at = datetime('now')
            "#,
            params![day.as_str(), id.get(), time.to_string()],
        )?;
        Ok(())
    }
}

/// A full day: macro config plus exactly six meals ordered by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: DayKey,
    pub macro_config: DailyMacroConfig,
    pub meals: Vec<Meal>,
}

impl DayPlan {
    /// Build a day from whichever meals are present, synthesizing the rest.
    ///
    /// A meal id appearing twice is a malformed tree, not something to merge.
    pub fn from_meals(
        day: DayKey,
        macro_config: DailyMacroConfig,
        meals: Vec<Meal>,
    ) -> PlanResult<Self> {
        let mut slots: Vec<Option<Meal>> = vec![None; MEALS_PER_DAY];
        for meal in meals {
            let slot = &mut slots[meal.id.index()];
            if slot.is_some() {
                return Err(PlanError::MalformedDay {
                    day: day.to_string(),
                    reason: format!("meal {} appears more than once", meal.id),
                });
            }
            *slot = Some(meal);
        }

        let meals = MealId::all()
            .zip(slots)
            .map(|(id, slot)| slot.unwrap_or_else(|| Meal::empty(id)))
            .collect();

        Ok(Self {
            day,
            macro_config,
            meals,
        })
    }

    /// An empty day with default times and no configuration
    pub fn empty(day: DayKey) -> Self {
        Self {
            day,
            macro_config: DailyMacroConfig::default(),
            meals: MealId::all().map(Meal::empty).collect(),
        }
    }

    /// Check the six-meal invariant on a tree that may have been built by hand
    pub fn validate(&self) -> PlanResult<()> {
        if self.meals.len() != MEALS_PER_DAY {
            return Err(PlanError::MalformedDay {
                day: self.day.to_string(),
                reason: format!("expected {} meals, found {}", MEALS_PER_DAY, self.meals.len()),
            });
        }
        for (expected, meal) in MealId::all().zip(&self.meals) {
            if meal.id != expected {
                return Err(PlanError::MalformedDay {
                    day: self.day.to_string(),
                    reason: format!("meal {} found in slot {}", meal.id, expected),
                });
            }
        }
        Ok(())
    }

    pub fn meal(&self, id: MealId) -> Option<&Meal> {
        self.meals.iter().find(|m| m.id == id)
    }

    pub fn items(&self) -> impl Iterator<Item = &FoodItem> {
        self.meals.iter().flat_map(|m| m.items.iter())
    }

    /// Load a day's config, meal times and food items
    pub fn load(conn: &Connection, day: DayKey) -> PlanResult<Self> {
        let malformed = |reason: String| PlanError::MalformedDay {
            day: day.to_string(),
            reason,
        };

        let macro_config = DailyMacroConfig::get_for_day(conn, day)?;

        let mut meals = Vec::new();
        for (raw_id, raw_time) in Meal::stored_times(conn, day)? {
            let id = MealId::new(raw_id)
                .map_err(|_| malformed(format!("stored meal id {} is outside 1-6", raw_id)))?;
            let time = MealTime::parse(&raw_time)
                .map_err(|_| malformed(format!("meal {} has stored time '{}'", id, raw_time)))?;
            meals.push(Meal {
                id,
                time,
                items: Vec::new(),
            });
        }

        let mut plan = Self::from_meals(day, macro_config, meals)?;

        for (raw_id, item) in FoodItem::list_for_day(conn, day)? {
            let id = MealId::new(raw_id).map_err(|_| {
                malformed(format!("food item attached to meal id {}", raw_id))
            })?;
            plan.meals[id.index()].items.push(item);
        }

        Ok(plan)
    }
}
