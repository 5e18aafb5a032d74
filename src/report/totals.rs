//! Daily totals aggregation

use serde::Serialize;

use crate::models::{DayPlan, FoodItem};

/// Sums of the five nutrient fields over every item of every meal in a day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayTotals {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub protein_g: f64,
}

impl DayTotals {
    /// Protein from both protein-bearing fields
    pub fn protein_total(&self) -> f64 {
        self.protein + self.protein_g
    }

    fn add_item(mut self, item: &FoodItem) -> Self {
        let n = item.nutrients.sanitized();
        self.calories += n.calories.unwrap_or(0.0);
        self.carbs += n.carbs.unwrap_or(0.0);
        self.protein += n.protein.unwrap_or(0.0);
        self.fat += n.fat.unwrap_or(0.0);
        self.protein_g += n.protein_g.unwrap_or(0.0);
        self
    }
}

/// Blank and non-numeric fields count as zero
pub fn aggregate(plan: &DayPlan) -> DayTotals {
    plan.items().fold(DayTotals::default(), DayTotals::add_item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayKey, MealId, Nutrients};

    fn item(calories: Option<f64>, protein: Option<f64>, protein_g: Option<f64>) -> FoodItem {
        let mut item = FoodItem::new("x", 100.0, Nutrients::none()).unwrap();
        item.nutrients = Nutrients {
            calories,
            protein,
            protein_g,
            carbs: Some(10.0),
            fat: None,
        };
        item
    }

    #[test]
    fn test_sums_across_all_meals() {
        let mut plan = DayPlan::empty(DayKey::Monday);
        plan.meals[0].items.push(item(Some(300.0), Some(20.0), None));
        plan.meals[0].items.push(item(Some(100.0), None, Some(5.0)));
        plan.meals[5].items.push(item(None, Some(10.0), None));

        let totals = aggregate(&plan);
        assert_eq!(totals.calories, 400.0);
        assert_eq!(totals.protein, 30.0);
        assert_eq!(totals.protein_g, 5.0);
        assert_eq!(totals.protein_total(), 35.0);
        assert_eq!(totals.carbs, 30.0);
        assert_eq!(totals.fat, 0.0);
    }

    #[test]
    fn test_non_numeric_counts_as_zero() {
        let mut plan = DayPlan::empty(DayKey::Monday);
        plan.meals[MealId::FIRST.index()]
            .items
            .push(item(Some(f64::NAN), Some(1.0), None));
        assert_eq!(aggregate(&plan).calories, 0.0);
    }

    #[test]
    fn test_empty_day_and_idempotence() {
        let plan = DayPlan::empty(DayKey::Friday);
        assert_eq!(aggregate(&plan), DayTotals::default());
        assert_eq!(aggregate(&plan), aggregate(&plan));
    }
}
