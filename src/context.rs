//! Per-operation planning context
//!
//! Settings are read fresh from the store for each operation and passed
//! explicitly into the engine; nothing is cached between calls.

use serde::Serialize;

use crate::db::PlanStore;
use crate::error::PlanResult;
use crate::models::{DayKey, DayPlan, Settings};
use crate::nutrition::{compute_targets, DayTargets, RebasePolicy};
use crate::report::{build_day_report, build_week_report, DayReport, WeekReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanContext {
    pub settings: Settings,
    pub rebase_policy: RebasePolicy,
}

impl PlanContext {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            rebase_policy: RebasePolicy::default(),
        }
    }

    /// Snapshot the current settings from the store
    pub fn load<S: PlanStore + ?Sized>(store: &S) -> PlanResult<Self> {
        Ok(Self::new(store.get_settings()?))
    }

    pub fn with_rebase_policy(mut self, policy: RebasePolicy) -> Self {
        self.rebase_policy = policy;
        self
    }

    pub fn targets(&self, plan: &DayPlan) -> DayTargets {
        compute_targets(&self.settings, &plan.macro_config)
    }

    pub fn day_report<S: PlanStore + ?Sized>(&self, store: &S, day: DayKey) -> PlanResult<DayReport> {
        let plan = store.get_daily_meal_plan(day)?;
        build_day_report(&self.settings, &plan)
    }

    /// Read all seven days, then build the report. Any failed read aborts
    /// before a report is produced.
    pub fn week_report<S: PlanStore + ?Sized>(&self, store: &S) -> PlanResult<WeekReport> {
        let plans = DayKey::ALL
            .iter()
            .map(|day| store.get_daily_meal_plan(*day))
            .collect::<PlanResult<Vec<_>>>()?;
        build_week_report(&self.settings, &plans)
    }
}
