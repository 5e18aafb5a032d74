//! Unit conversion for the g/lb toggle
//!
//! All engine math is metric. These helpers convert user-facing values in
//! and out of the active unit system.

use crate::models::UnitSystem;

/// Grams per pound
pub const G_PER_LB: f64 = 453.592;
/// Kilograms per pound
pub const KG_PER_LB: f64 = G_PER_LB / 1000.0;

/// Body weight entered in the active unit system, as kilograms
pub fn weight_to_kg(value: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => value * KG_PER_LB,
    }
}

/// Body weight in kilograms, expressed in the active unit system
pub fn weight_from_kg(kg: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => kg,
        UnitSystem::Imperial => kg / KG_PER_LB,
    }
}

/// Serving amount entered in the active unit system, as grams
pub fn amount_to_grams(value: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => value * G_PER_LB,
    }
}

/// Serving amount in grams, expressed in the active unit system
pub fn amount_from_grams(grams: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => grams,
        UnitSystem::Imperial => grams / G_PER_LB,
    }
}

/// Label for body weight values
pub fn weight_unit(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Metric => "kg",
        UnitSystem::Imperial => "lb",
    }
}

/// Label for serving amounts
pub fn amount_unit(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Metric => "g",
        UnitSystem::Imperial => "lb",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_is_identity() {
        assert_eq!(weight_to_kg(80.0, UnitSystem::Metric), 80.0);
        assert_eq!(amount_to_grams(150.0, UnitSystem::Metric), 150.0);
    }

    #[test]
    fn test_pounds_to_kg() {
        let kg = weight_to_kg(200.0, UnitSystem::Imperial);
        assert!((kg - 90.7184).abs() < 0.001);
        assert!((weight_from_kg(kg, UnitSystem::Imperial) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_pounds_to_grams() {
        assert!((amount_to_grams(1.0, UnitSystem::Imperial) - G_PER_LB).abs() < 1e-9);
        assert!((amount_from_grams(226.796, UnitSystem::Imperial) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_labels() {
        assert_eq!(weight_unit(UnitSystem::Imperial), "lb");
        assert_eq!(amount_unit(UnitSystem::Metric), "g");
    }
}
