//! Day key
//!
//! The seven fixed weekday keys a meal plan is organized by.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// One of the seven weekly plan days, Sunday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayKey {
    /// All day keys in week order (Sunday..Saturday)
    pub const ALL: [DayKey; 7] = [
        DayKey::Sunday,
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayKey::Sunday => "sunday",
            DayKey::Monday => "monday",
            DayKey::Tuesday => "tuesday",
            DayKey::Wednesday => "wednesday",
            DayKey::Thursday => "thursday",
            DayKey::Friday => "friday",
            DayKey::Saturday => "saturday",
        }
    }

    /// Parse a day key; only the seven lowercase names (any case) are accepted
    pub fn parse(s: &str) -> PlanResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "sunday" => Ok(DayKey::Sunday),
            "monday" => Ok(DayKey::Monday),
            "tuesday" => Ok(DayKey::Tuesday),
            "wednesday" => Ok(DayKey::Wednesday),
            "thursday" => Ok(DayKey::Thursday),
            "friday" => Ok(DayKey::Friday),
            "saturday" => Ok(DayKey::Saturday),
            _ => Err(PlanError::UnknownDayKey(s.to_string())),
        }
    }

    /// Position in the week, Sunday = 0
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_weekday(date.weekday())
    }

    /// Day key for the local current date
    pub fn today() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_all_keys() {
        for day in DayKey::ALL {
            assert_eq!(DayKey::parse(day.as_str()).unwrap(), day);
        }
        assert_eq!(DayKey::parse("Monday").unwrap(), DayKey::Monday);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            DayKey::parse("someday"),
            Err(PlanError::UnknownDayKey(_))
        ));
    }

    #[test]
    fn test_week_starts_on_sunday() {
        assert_eq!(DayKey::Sunday.index(), 0);
        assert_eq!(DayKey::Saturday.index(), 6);
        assert_eq!(DayKey::from_weekday(Weekday::Sun), DayKey::Sunday);
        assert_eq!(DayKey::from_weekday(Weekday::Wed), DayKey::Wednesday);
    }

    #[test]
    fn test_from_date() {
        // 2026-10-18 is a Sunday
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(DayKey::from_date(date), DayKey::Sunday);
    }
}
