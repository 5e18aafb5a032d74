//! Macro Planner Library
//!
//! Weekly macronutrient planning: per-day targets, meal scheduling,
//! serving rescaling and achievement reports.

pub mod build_info;
pub mod context;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod report;
pub mod schedule;
pub mod tools;

pub use error::{PlanError, PlanResult};
