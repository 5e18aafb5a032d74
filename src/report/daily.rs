//! Day report
//!
//! Totals, targets and per-metric achievement for one day.

use serde::Serialize;

use crate::error::PlanResult;
use crate::models::{DayKey, DayPlan, Settings};
use crate::nutrition::{compute_targets, DayTargets};
use super::achievement::{achievement_percentage, classify, overall_status, Achievement, Tier};
use super::totals::{aggregate, DayTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Calories,
    Protein,
    Fat,
    Carbs,
}

/// One metric's actual value against its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricReport {
    pub metric: Metric,
    pub actual: f64,
    pub target: f64,
    /// `None` when the metric has no target; render the value alone
    pub achievement: Option<Achievement>,
}

impl MetricReport {
    fn new(metric: Metric, actual: f64, target: f64) -> Self {
        Self {
            metric,
            actual,
            target,
            achievement: classify(actual, target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub day: DayKey,
    pub totals: DayTotals,
    pub targets: DayTargets,
    pub metrics: [MetricReport; 4],
    /// Calorie percentage of goal (0 without a goal), used for on-track counting
    pub calorie_achievement: f64,
    pub status: Tier,
}

impl DayReport {
    pub fn metric(&self, metric: Metric) -> &MetricReport {
        match metric {
            Metric::Calories => &self.metrics[0],
            Metric::Protein => &self.metrics[1],
            Metric::Fat => &self.metrics[2],
            Metric::Carbs => &self.metrics[3],
        }
    }
}

/// Aggregate, target and classify a day. The plan must satisfy the six-meal
/// invariant.
pub fn build_day_report(settings: &Settings, plan: &DayPlan) -> PlanResult<DayReport> {
    plan.validate()?;

    let totals = aggregate(plan);
    let targets = compute_targets(settings, &plan.macro_config);

    let metrics = [
        MetricReport::new(Metric::Calories, totals.calories, targets.goal_calories),
        MetricReport::new(Metric::Protein, totals.protein_total(), targets.protein_target),
        MetricReport::new(Metric::Fat, totals.fat, targets.fat_target),
        MetricReport::new(Metric::Carbs, totals.carbs, targets.carb_target),
    ];

    let tiers: Vec<Tier> = metrics
        .iter()
        .filter_map(|m| m.achievement.map(|a| a.tier))
        .collect();

    Ok(DayReport {
        day: plan.day,
        totals,
        targets,
        metrics,
        calorie_achievement: achievement_percentage(totals.calories, targets.goal_calories),
        status: overall_status(&tiers),
    })
}
