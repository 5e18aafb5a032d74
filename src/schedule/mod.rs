//! Meal scheduling

pub mod cascade;

pub use cascade::{apply_cascade, cascade, cascade_time, set_meal_time, CascadeOutcome};
