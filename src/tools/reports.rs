//! Report Tools
//!
//! Day targets, day reports and the weekly achievement report, rounded for
//! display (one decimal; whole calories).

use serde::Serialize;

use crate::context::PlanContext;
use crate::db::{Database, PlanStore};
use crate::models::DayKey;
use crate::nutrition::{round1, round_calories, DayTargets};
use crate::report::{DayReport, Metric, MetricReport, Tier, WeekReport};

#[derive(Debug, Serialize)]
pub struct TargetsView {
    pub goal_calories: f64,
    pub protein_target: f64,
    pub fat_target: f64,
    pub carb_target: f64,
}

impl From<&DayTargets> for TargetsView {
    fn from(t: &DayTargets) -> Self {
        Self {
            goal_calories: round_calories(t.goal_calories),
            protein_target: round1(t.protein_target),
            fat_target: round1(t.fat_target),
            carb_target: round1(t.carb_target),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayTargetsResponse {
    pub day: DayKey,
    pub targets: TargetsView,
}

#[derive(Debug, Serialize)]
pub struct MetricView {
    pub metric: Metric,
    pub actual: f64,
    /// Absent when the metric has no target
    pub target: Option<f64>,
    pub percentage: Option<f64>,
    pub tier: Option<Tier>,
}

impl From<&MetricReport> for MetricView {
    fn from(m: &MetricReport) -> Self {
        let round = |v: f64| match m.metric {
            Metric::Calories => round_calories(v),
            _ => round1(v),
        };
        Self {
            metric: m.metric,
            actual: round(m.actual),
            target: m.achievement.map(|_| round(m.target)),
            percentage: m.achievement.map(|a| round1(a.percentage)),
            tier: m.achievement.map(|a| a.tier),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayReportView {
    pub day: DayKey,
    pub metrics: Vec<MetricView>,
    pub calorie_achievement: f64,
    pub status: Tier,
}

impl From<&DayReport> for DayReportView {
    fn from(r: &DayReport) -> Self {
        Self {
            day: r.day,
            metrics: r.metrics.iter().map(MetricView::from).collect(),
            calorie_achievement: round1(r.calorie_achievement),
            status: r.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WeekSummaryView {
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
    pub days_on_track: usize,
}

#[derive(Debug, Serialize)]
pub struct WeekReportResponse {
    pub days: Vec<DayReportView>,
    pub summary: WeekSummaryView,
}

impl From<&WeekReport> for WeekReportResponse {
    fn from(r: &WeekReport) -> Self {
        let s = &r.summary;
        Self {
            days: r.days.iter().map(DayReportView::from).collect(),
            summary: WeekSummaryView {
                avg_daily_calories: round_calories(s.avg_daily_calories),
                avg_goal_calories: round_calories(s.avg_goal_calories),
                goal_achievement: round1(s.goal_achievement),
                avg_protein_actual: round1(s.avg_protein_actual),
                avg_protein_target: round1(s.avg_protein_target),
                protein_achievement: round1(s.protein_achievement),
                avg_fat_actual: round1(s.avg_fat_actual),
                avg_fat_target: round1(s.avg_fat_target),
                fat_achievement: round1(s.fat_achievement),
                avg_carb_actual: round1(s.avg_carb_actual),
                avg_carb_target: round1(s.avg_carb_target),
                carb_achievement: round1(s.carb_achievement),
                days_on_track: s.days_on_track,
            },
        }
    }
}

fn load_context(db: &Database) -> Result<PlanContext, String> {
    PlanContext::load(db).map_err(|e| format!("Failed to load settings: {}", e))
}

/// Targets for a day; defaults to today's weekday
pub fn get_day_targets(db: &Database, day: Option<&str>) -> Result<DayTargetsResponse, String> {
    let day = match day {
        Some(d) => DayKey::parse(d).map_err(|e| e.to_string())?,
        None => DayKey::today(),
    };
    let ctx = load_context(db)?;
    let plan = db
        .get_daily_meal_plan(day)
        .map_err(|e| format!("Failed to load {}: {}", day, e))?;

    Ok(DayTargetsResponse {
        day,
        targets: TargetsView::from(&ctx.targets(&plan)),
    })
}

pub fn get_day_report(db: &Database, day: Option<&str>) -> Result<DayReportView, String> {
    let day = match day {
        Some(d) => DayKey::parse(d).map_err(|e| e.to_string())?,
        None => DayKey::today(),
    };
    let ctx = load_context(db)?;
    let report = ctx
        .day_report(db, day)
        .map_err(|e| format!("Failed to build report for {}: {}", day, e))?;
    Ok(DayReportView::from(&report))
}

pub fn get_week_report(db: &Database) -> Result<WeekReportResponse, String> {
    let ctx = load_context(db)?;
    let report = ctx
        .week_report(db)
        .map_err(|e| format!("Failed to build week report: {}", e))?;

    tracing::info!(
        "Week report: {:.1}% of goal, {} days on track",
        report.summary.goal_achievement,
        report.summary.days_on_track
    );

    Ok(WeekReportResponse::from(&report))
}
