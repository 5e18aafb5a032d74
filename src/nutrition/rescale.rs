//! Serving-size rescaling
//!
//! Nutrient values are linear in the serving amount: a value recorded at
//! `base_amount` scales by `new_amount / base_amount`. A zero base amount has
//! no meaningful ratio and yields "no value" rather than zero.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::models::Nutrients;

/// Amount change (in serving units) above which an edit counts as deliberate
pub const REBASE_EPSILON: f64 = 0.1;

/// What to do with the reference serving when the user edits an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RebasePolicy {
    /// Promote the edited amount (and its values) to be the new base once
    /// it differs from the base by more than `REBASE_EPSILON`
    #[default]
    RebaseOnEdit,
    /// Always rescale from the originally selected serving
    KeepOriginal,
}

impl RebasePolicy {
    /// A zero amount is never a reference point: it would leave no ratio to
    /// rescale from.
    pub fn should_rebase(&self, base_amount: f64, new_amount: f64) -> bool {
        match self {
            RebasePolicy::RebaseOnEdit => {
                new_amount > 0.0 && (new_amount - base_amount).abs() > REBASE_EPSILON
            }
            RebasePolicy::KeepOriginal => false,
        }
    }
}

/// Reject negative and non-numeric serving amounts at the boundary
pub fn validate_amount(amount: f64) -> PlanResult<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(PlanError::InvalidAmount(amount))
    }
}

/// Value of a nutrient at `new_amount`, given its value at `base_amount`.
///
/// Returns `None` when `base_amount <= 0`. The result is unrounded; round
/// only for display.
pub fn rescale(base_value: f64, base_amount: f64, new_amount: f64) -> Option<f64> {
    if base_amount.is_nan() || base_amount <= 0.0 {
        return None;
    }
    Some(base_value * (new_amount / base_amount))
}

/// Rescale all five nutrient fields; blank fields stay blank
pub fn rescale_nutrients(base: &Nutrients, base_amount: f64, new_amount: f64) -> Nutrients {
    if base_amount.is_nan() || base_amount <= 0.0 {
        return Nutrients::none();
    }
    base.map(|v| rescale(v, base_amount, new_amount))
}
