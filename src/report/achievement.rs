//! Achievement classification
//!
//! Actual intake is compared with a target as a percentage and bucketed into
//! tiers. Metrics without a target are left out of classification.

use std::fmt;

use serde::Serialize;

/// Percentage band (inclusive) for an excellent reading
pub const EXCELLENT_BAND: (f64, f64) = (95.0, 105.0);
/// Percentage band (inclusive) for a good reading; contains the excellent band
pub const GOOD_BAND: (f64, f64) = (90.0, 110.0);
/// Share of classified metrics that must be good or better for a good day
pub const GOOD_DAY_SHARE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Excellent => "excellent",
            Tier::Good => "good",
            Tier::NeedsImprovement => "needs-improvement",
        }
    }

    pub fn is_good_or_better(&self) -> bool {
        matches!(self, Tier::Excellent | Tier::Good)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Achievement {
    pub percentage: f64,
    pub tier: Tier,
}

fn within(percentage: f64, (low, high): (f64, f64)) -> bool {
    low <= percentage && percentage <= high
}

/// `actual / target * 100`, or 0 when there is no target
pub fn achievement_percentage(actual: f64, target: f64) -> f64 {
    if target > 0.0 {
        actual / target * 100.0
    } else {
        0.0
    }
}

/// Excellent is checked first since its band sits inside the good band
pub fn tier_for(percentage: f64) -> Tier {
    if within(percentage, EXCELLENT_BAND) {
        Tier::Excellent
    } else if within(percentage, GOOD_BAND) {
        Tier::Good
    } else {
        Tier::NeedsImprovement
    }
}

/// Whether a calorie achievement counts as an on-track day
pub fn is_on_track(percentage: f64) -> bool {
    within(percentage, EXCELLENT_BAND)
}

/// Classify a metric; `None` when no target is set (`target <= 0`)
pub fn classify(actual: f64, target: f64) -> Option<Achievement> {
    if !target.is_finite() || target <= 0.0 {
        return None;
    }
    let percentage = achievement_percentage(actual, target);
    Some(Achievement {
        percentage,
        tier: tier_for(percentage),
    })
}

/// Overall day status from the tiers of the metrics that have targets
pub fn overall_status(tiers: &[Tier]) -> Tier {
    if tiers.is_empty() {
        return Tier::NeedsImprovement;
    }

    let total = tiers.len() as f64;
    let excellent = tiers.iter().filter(|t| **t == Tier::Excellent).count();
    let good_or_better = tiers.iter().filter(|t| t.is_good_or_better()).count();
    let poor = tiers.iter().filter(|t| **t == Tier::NeedsImprovement).count();

    if excellent == tiers.len() {
        Tier::Excellent
    } else if poor == 0 && good_or_better as f64 >= GOOD_DAY_SHARE * total {
        Tier::Good
    } else {
        Tier::NeedsImprovement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_inclusive() {
        assert_eq!(tier_for(95.0), Tier::Excellent);
        assert_eq!(tier_for(105.0), Tier::Excellent);
        assert_eq!(tier_for(94.9), Tier::Good);
        assert_eq!(tier_for(90.0), Tier::Good);
        assert_eq!(tier_for(110.0), Tier::Good);
        assert_eq!(tier_for(89.9), Tier::NeedsImprovement);
        assert_eq!(tier_for(110.1), Tier::NeedsImprovement);
        assert_eq!(tier_for(0.0), Tier::NeedsImprovement);
    }

    #[test]
    fn test_excellent_band_inside_good_band() {
        let mut p = 80.0;
        while p <= 120.0 {
            if tier_for(p) == Tier::Excellent {
                assert!(within(p, GOOD_BAND));
            }
            p += 0.25;
        }
    }

    #[test]
    fn test_classify_without_target() {
        assert_eq!(classify(500.0, 0.0), None);
        assert_eq!(classify(500.0, -10.0), None);
        assert_eq!(achievement_percentage(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_classify_with_target() {
        let a = classify(1950.0, 2000.0).unwrap();
        assert!((a.percentage - 97.5).abs() < 1e-9);
        assert_eq!(a.tier, Tier::Excellent);
        assert_eq!(classify(2300.0, 2000.0).unwrap().tier, Tier::NeedsImprovement);
    }

    #[test]
    fn test_overall_all_excellent() {
        assert_eq!(overall_status(&[Tier::Excellent; 4]), Tier::Excellent);
    }

    #[test]
    fn test_overall_good_without_poor() {
        let tiers = [Tier::Excellent, Tier::Good, Tier::Excellent, Tier::Good];
        assert_eq!(overall_status(&tiers), Tier::Good);
    }

    #[test]
    fn test_overall_any_poor_fails() {
        let tiers = [Tier::Excellent, Tier::Excellent, Tier::Excellent, Tier::NeedsImprovement];
        assert_eq!(overall_status(&tiers), Tier::NeedsImprovement);
    }

    #[test]
    fn test_overall_empty_subset() {
        assert_eq!(overall_status(&[]), Tier::NeedsImprovement);
    }

    #[test]
    fn test_tier_serializes_kebab_case() {
        let json = serde_json::to_string(&Tier::NeedsImprovement).unwrap();
        assert_eq!(json, "\"needs-improvement\"");
    }
}
