//! Weekly report
//!
//! Runs the day report over all seven days and summarizes the week.

use serde::Serialize;

use crate::error::{PlanError, PlanResult};
use crate::models::{DayKey, DayPlan, Settings};
use super::achievement::{achievement_percentage, is_on_track};
use super::daily::{build_day_report, DayReport};

/// Week-level averages and achievement percentages
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeekSummary {
    pub avg_daily_calories: f64,
    pub avg_goal_calories: f64,
    pub goal_achievement: f64,
    pub avg_protein_actual: f64,
    pub avg_protein_target: f64,
    pub protein_achievement: f64,
    pub avg_fat_actual: f64,
    pub avg_fat_target: f64,
    pub fat_achievement: f64,
    pub avg_carb_actual: f64,
    pub avg_carb_target: f64,
    pub carb_achievement: f64,
    /// Days whose calorie achievement is within 95-105%
    pub days_on_track: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekReport {
    /// Sunday through Saturday
    pub days: Vec<DayReport>,
    pub summary: WeekSummary,
}

fn mean<F>(days: &[DayReport], f: F) -> f64
where
    F: Fn(&DayReport) -> f64,
{
    if days.is_empty() {
        return 0.0;
    }
    days.iter().map(f).sum::<f64>() / days.len() as f64
}

/// Put the seven plans in week order, refusing anything that is not exactly
/// one plan per day key
fn order_week(plans: &[DayPlan]) -> PlanResult<Vec<&DayPlan>> {
    if plans.len() != DayKey::ALL.len() {
        return Err(PlanError::MalformedWeek(format!(
            "expected 7 days, got {}",
            plans.len()
        )));
    }

    let mut ordered: Vec<Option<&DayPlan>> = vec![None; DayKey::ALL.len()];
    for plan in plans {
        let slot = &mut ordered[plan.day.index()];
        if slot.is_some() {
            return Err(PlanError::MalformedWeek(format!("{} appears more than once", plan.day)));
        }
        *slot = Some(plan);
    }

    // Seven distinct keys out of seven means every slot is filled
    Ok(ordered.into_iter().flatten().collect())
}

pub fn summarize(days: &[DayReport]) -> WeekSummary {
    let avg_daily_calories = mean(days, |d| d.totals.calories);
    let avg_goal_calories = mean(days, |d| d.targets.goal_calories);
    let avg_protein_actual = mean(days, |d| d.totals.protein_total());
    let avg_protein_target = mean(days, |d| d.targets.protein_target);
    let avg_fat_actual = mean(days, |d| d.totals.fat);
    let avg_fat_target = mean(days, |d| d.targets.fat_target);
    let avg_carb_actual = mean(days, |d| d.totals.carbs);
    let avg_carb_target = mean(days, |d| d.targets.carb_target);

    WeekSummary {
        avg_daily_calories,
        avg_goal_calories,
        goal_achievement: achievement_percentage(avg_daily_calories, avg_goal_calories),
        avg_protein_actual,
        avg_protein_target,
        protein_achievement: achievement_percentage(avg_protein_actual, avg_protein_target),
        avg_fat_actual,
        avg_fat_target,
        fat_achievement: achievement_percentage(avg_fat_actual, avg_fat_target),
        avg_carb_actual,
        avg_carb_target,
        carb_achievement: achievement_percentage(avg_carb_actual, avg_carb_target),
        days_on_track: days
            .iter()
            .filter(|d| is_on_track(d.calorie_achievement))
            .count(),
    }
}

/// Build the report for a full week of plans (any order, one per day key)
pub fn build_week_report(settings: &Settings, plans: &[DayPlan]) -> PlanResult<WeekReport> {
    let days = order_week(plans)?
        .into_iter()
        .map(|plan| build_day_report(settings, plan))
        .collect::<PlanResult<Vec<_>>>()?;

    let summary = summarize(&days);

    Ok(WeekReport { days, summary })
}
