//! Nutrient values carried by a food item
//!
//! Each field is optional: `None` means "no value" (blank), which is not the
//! same thing as zero.

use serde::{Deserialize, Serialize};

/// The five tracked nutrient fields of a food item
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    pub calories: Option<f64>,
    pub carbs: Option<f64>,     // grams
    pub protein: Option<f64>,   // grams
    pub fat: Option<f64>,       // grams
    /// Protein recorded under the food database's separate gram column
    pub protein_g: Option<f64>, // grams
}

impl Nutrients {
    /// All fields blank
    pub fn none() -> Self {
        Self::default()
    }

    /// Apply `f` to every present field; blank fields stay blank
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> Option<f64>,
    {
        Self {
            calories: self.calories.and_then(&f),
            carbs: self.carbs.and_then(&f),
            protein: self.protein.and_then(&f),
            fat: self.fat.and_then(&f),
            protein_g: self.protein_g.and_then(&f),
        }
    }

    /// Drop values that are not finite numbers
    pub fn sanitized(&self) -> Self {
        self.map(|v| v.is_finite().then_some(v))
    }

    pub fn is_blank(&self) -> bool {
        self.calories.is_none()
            && self.carbs.is_none()
            && self.protein.is_none()
            && self.fat.is_none()
            && self.protein_g.is_none()
    }
}
