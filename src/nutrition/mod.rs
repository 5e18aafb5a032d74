//! Nutrition calculation module
//!
//! Serving rescaling, macro targets, unit conversion and display rounding.

pub mod format;
pub mod rescale;
pub mod targets;
pub mod units;

pub use format::{round1, round_calories};
pub use rescale::{rescale, rescale_nutrients, validate_amount, RebasePolicy, REBASE_EPSILON};
pub use targets::{compute_targets, DayTargets};
