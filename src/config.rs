use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::models::Role;
use crate::planner::constants::*;

/// Objective weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    /// Weight of the distinct-ingredient count (alpha).
    pub ingredient: f64,
    /// Weight of the on-hand usage reward (beta).
    pub on_hand: f64,
    /// Weight of the quantization slack (gamma).
    pub quantization: f64,
    /// Penalty per selection beyond the weekly cap, soft repetition only.
    pub repetition_penalty: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            ingredient: DEFAULT_INGREDIENT_WEIGHT,
            on_hand: DEFAULT_ON_HAND_WEIGHT,
            quantization: DEFAULT_QUANTIZATION_WEIGHT,
            repetition_penalty: DEFAULT_REPETITION_PENALTY,
        }
    }
}

/// Which declared packaging size drives quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingUnit {
    First,
    #[default]
    Smallest,
    Largest,
}

impl PackagingUnit {
    /// Pick a unit from `units`, or `None` when nothing usable is declared.
    pub fn pick(&self, units: impl IntoIterator<Item = f64>) -> Option<f64> {
        let mut units = units.into_iter().filter(|w| w.is_finite() && *w > 0.0);
        match self {
            PackagingUnit::First => units.next(),
            PackagingUnit::Smallest => units.reduce(f64::min),
            PackagingUnit::Largest => units.reduce(f64::max),
        }
    }
}

/// Which role a full-meal staple replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuppressionPolicy {
    #[default]
    Main,
    Side,
}

impl SuppressionPolicy {
    /// The role dropped on a full-meal day.
    pub fn suppressed(&self) -> Role {
        match self {
            SuppressionPolicy::Main => Role::Main,
            SuppressionPolicy::Side => Role::Side,
        }
    }

    /// The role still required on a full-meal day.
    pub fn retained(&self) -> Role {
        match self {
            SuppressionPolicy::Main => Role::Side,
            SuppressionPolicy::Side => Role::Main,
        }
    }
}

/// Whether a constraint family is enforced strictly or priced in the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintMode {
    Hard,
    Soft,
}

/// How on-hand ingredient quantities are accounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnHandMode {
    /// Weekly usage must equal the on-hand quantity.
    Exact,
    /// Weekly usage plus leftover equals the on-hand quantity.
    #[default]
    Leftover,
}

/// Fixed model formulations. Chosen statically, never generated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formulation {
    /// Calorie band, macro bounds and micronutrient bounds.
    #[default]
    Full,
    /// Micronutrient bounds only; no calorie band, no protein/fat/carbohydrate.
    MicronutrientsOnly,
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub time_limit_secs: u64,
    pub weights: ObjectiveWeights,
    pub packaging_unit: PackagingUnit,
    pub suppression: SuppressionPolicy,
    pub repetition: ConstraintMode,
    pub quantization: ConstraintMode,
    pub on_hand: OnHandMode,
    /// Title of the staple exempt from the once-per-week cap.
    pub carrier_title: String,
    /// Staple kinds that change the day's composition.
    pub full_meal_kinds: BTreeSet<String>,
    pub formulation: Formulation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            weights: ObjectiveWeights::default(),
            packaging_unit: PackagingUnit::default(),
            suppression: SuppressionPolicy::default(),
            repetition: ConstraintMode::Hard,
            quantization: ConstraintMode::Soft,
            on_hand: OnHandMode::default(),
            carrier_title: DEFAULT_CARRIER_TITLE.to_string(),
            full_meal_kinds: DEFAULT_FULL_MEAL_KINDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            formulation: Formulation::default(),
        }
    }
}

impl EngineConfig {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    /// Reject settings the model builder cannot honor.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        for (name, value) in [
            ("ingredient", w.ingredient),
            ("on_hand", w.on_hand),
            ("quantization", w.quantization),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MenuError::InvalidConfig(format!(
                    "weight {} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.repetition == ConstraintMode::Soft
            && !(w.repetition_penalty.is_finite() && w.repetition_penalty > 0.0)
        {
            return Err(MenuError::InvalidConfig(
                "soft repetition needs a positive repetition_penalty".to_string(),
            ));
        }
        if self.time_limit_secs == 0 {
            return Err(MenuError::InvalidConfig(
                "time_limit_secs must be at least 1".to_string(),
            ));
        }
        if self.carrier_title.trim().is_empty() {
            return Err(MenuError::InvalidConfig(
                "carrier_title must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load an engine configuration from a JSON file. Missing fields take defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.repetition, ConstraintMode::Hard);
        assert_eq!(config.quantization, ConstraintMode::Soft);
        assert!(config.full_meal_kinds.contains("curry"));
    }

    #[test]
    fn test_rejects_zero_weight() {
        let mut config = EngineConfig::default();
        config.weights.quantization = 0.0;
        assert!(matches!(
            config.validate(),
            Err(MenuError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_packaging_unit_pick() {
        let units = [200.0, 50.0, 100.0];
        assert_eq!(PackagingUnit::First.pick(units), Some(200.0));
        assert_eq!(PackagingUnit::Smallest.pick(units), Some(50.0));
        assert_eq!(PackagingUnit::Largest.pick(units), Some(200.0));
        assert_eq!(PackagingUnit::Smallest.pick([]), None);
    }

    #[test]
    fn test_suppression_roles() {
        assert_eq!(SuppressionPolicy::Main.suppressed(), Role::Main);
        assert_eq!(SuppressionPolicy::Main.retained(), Role::Side);
        assert_eq!(SuppressionPolicy::Side.suppressed(), Role::Side);
    }

    #[test]
    fn test_load_partial_config() {
        let json = r#"{"suppression": "side", "repetition": "soft", "formulation": "micronutrients-only"}"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.suppression, SuppressionPolicy::Side);
        assert_eq!(config.repetition, ConstraintMode::Soft);
        assert_eq!(config.formulation, Formulation::MicronutrientsOnly);
        assert_eq!(config.time_limit_secs, DEFAULT_TIME_LIMIT_SECS);
    }
}
