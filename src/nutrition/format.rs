//! Display rounding
//!
//! Derived nutrient and percentage values render to one decimal place;
//! calorie counts render as whole numbers.

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round_calories(value: f64) -> f64 {
    value.round()
}
