use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Formulation;
use crate::error::{MenuError, Result};
use crate::models::NutritionTarget;
use crate::planner::constants::*;

/// A per-day bound on one nutrient. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bound {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bound {
    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Whether `value` lies inside the bound, allowing `tolerance` on each side.
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        self.lower.is_none_or(|lo| value >= lo - tolerance)
            && self.upper.is_none_or(|hi| value <= hi + tolerance)
    }

    pub fn is_open(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

/// Per-day nutrient bounds in absolute units, ready for the model builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutrientBounds {
    /// The exact calorie target the bounds were derived from.
    pub calorie_target: Option<f64>,
    bounds: BTreeMap<String, Bound>,
}

impl NutrientBounds {
    pub fn get(&self, nutrient: &str) -> Option<&Bound> {
        self.bounds.get(nutrient)
    }

    /// Constrained nutrients in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bound)> {
        self.bounds.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// Grams of a macro nutrient supplying `percentage` percent of `calorie_target`.
///
/// Formula: grams = calorie_target x percentage / 100 / kcal_per_gram
pub fn macro_grams(calorie_target: f64, percentage: f64, kcal_per_gram: f64) -> f64 {
    calorie_target * (percentage / 100.0) / kcal_per_gram
}

/// Symmetric calorie tolerance band around the exact target.
pub fn calorie_band(calorie_target: f64) -> Bound {
    Bound::between(
        calorie_target * CALORIE_BAND_LOW,
        calorie_target * CALORIE_BAND_HIGH,
    )
}

/// Split `protein_upper` into (`protein`, is_upper).
fn split_bound_key(key: &str) -> Option<(&str, bool)> {
    if let Some(nutrient) = key.strip_suffix(UPPER_SUFFIX) {
        Some((nutrient, true))
    } else {
        key.strip_suffix(LOWER_SUFFIX).map(|nutrient| (nutrient, false))
    }
}

/// Convert a target template's bound map into absolute per-day bounds.
///
/// - `calorie` becomes the band [0.9, 1.1] x target.
/// - `protein`/`fat`/`carbohydrate` bounds are percentages of the calorie
///   target, converted to grams with 4/9/4 kcal per gram.
/// - every other `<nutrient>_upper`/`_lower` is taken literally; a missing side
///   stays open.
/// - iron's lower bound comes from `iron_menstruation_lower` when
///   `menstruating` is set and the template declares it.
///
/// The micronutrients-only formulation drops the calorie band and the macro
/// bounds, and does not need a calorie target.
pub fn convert_bounds(
    target: &NutritionTarget,
    menstruating: bool,
    formulation: Formulation,
) -> Result<NutrientBounds> {
    let with_macros = formulation == Formulation::Full;

    let calorie_target = target
        .bounds
        .get(CALORIE_KEY)
        .copied()
        .filter(|c| c.is_finite() && *c > 0.0);
    if with_macros && calorie_target.is_none() {
        return Err(MenuError::MissingCalorieTarget);
    }

    let mut bounds: BTreeMap<String, Bound> = BTreeMap::new();

    if with_macros && let Some(calorie) = calorie_target {
        bounds.insert(CALORIE_KEY.to_string(), calorie_band(calorie));
    }

    for (key, &value) in &target.bounds {
        if key == CALORIE_KEY || key == IRON_MENSTRUATION_LOWER_KEY {
            continue;
        }
        let Some((nutrient, is_upper)) = split_bound_key(key) else {
            debug!(key = %key, "ignoring bound key without _upper/_lower suffix");
            continue;
        };
        if nutrient == CALORIE_KEY {
            // The band replaces any explicit calorie limits
            continue;
        }
        if !value.is_finite() {
            warn!(key = %key, "ignoring non-finite bound");
            continue;
        }

        let limit = match energy_factor(nutrient) {
            Some(factor) => {
                let Some(calorie) = calorie_target.filter(|_| with_macros) else {
                    continue;
                };
                macro_grams(calorie, value, factor)
            }
            None => value,
        };

        let bound = bounds.entry(nutrient.to_string()).or_default();
        if is_upper {
            bound.upper = Some(limit);
        } else {
            bound.lower = Some(limit);
        }
    }

    if menstruating {
        if let Some(&lower) = target.bounds.get(IRON_MENSTRUATION_LOWER_KEY) {
            bounds.entry(IRON_KEY.to_string()).or_default().lower = Some(lower);
        } else {
            debug!("template has no menstruation-specific iron bound, using the standard one");
        }
    }

    for (nutrient, bound) in &bounds {
        if let (Some(lo), Some(hi)) = (bound.lower, bound.upper)
            && lo > hi
        {
            warn!(nutrient = %nutrient, lower = lo, upper = hi, "lower bound exceeds upper bound");
        }
    }

    Ok(NutrientBounds {
        calorie_target,
        bounds,
    })
}
