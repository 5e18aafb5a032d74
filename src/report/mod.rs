//! Reports
//!
//! The pure pipeline from a day's meal tree to day and week reports:
//! totals -> targets -> achievement -> summary.

pub mod achievement;
pub mod daily;
pub mod totals;
pub mod weekly;

pub use achievement::{classify, overall_status, tier_for, Achievement, Tier};
pub use daily::{build_day_report, DayReport, Metric, MetricReport};
pub use totals::{aggregate, DayTotals};
pub use weekly::{build_week_report, WeekReport, WeekSummary};
