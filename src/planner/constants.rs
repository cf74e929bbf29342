/// Key of the exact calorie target in a nutrition target's bound map.
pub const CALORIE_KEY: &str = "calorie";

/// Suffix of an upper-bound key (`<nutrient>_upper`).
pub const UPPER_SUFFIX: &str = "_upper";

/// Suffix of a lower-bound key (`<nutrient>_lower`).
pub const LOWER_SUFFIX: &str = "_lower";

/// Nutrient whose lower bound depends on the menstruation flag.
pub const IRON_KEY: &str = "iron";

/// Iron lower bound used when the profile is menstruating.
pub const IRON_MENSTRUATION_LOWER_KEY: &str = "iron_menstruation_lower";

/// Calorie band around the exact target: [0.9, 1.1] x target.
pub const CALORIE_BAND_LOW: f64 = 0.9;
pub const CALORIE_BAND_HIGH: f64 = 1.1;

/// kcal per gram of protein and carbohydrate.
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBOHYDRATE: f64 = 4.0;

/// kcal per gram of fat.
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Age bracket that triggers the activity-level override.
pub const ELDERLY_BRACKET: &str = "75+";

/// Dishes per day: staple + soup + (main and/or side).
pub const MIN_DISHES_PER_DAY: f64 = 3.0;
pub const MAX_DISHES_PER_DAY: f64 = 4.0;

/// Weekly cap for the carrier staple (once per day).
pub const CARRIER_WEEKLY_CAP: f64 = 7.0;

/// Weekly cap for every other recipe.
pub const ORDINARY_WEEKLY_CAP: f64 = 1.0;

/// Assignment values at or above this count as selected.
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// Tolerance used when re-checking an extracted plan against its bounds.
pub const VERIFY_TOLERANCE: f64 = 1e-6;

/// Relative tolerance when checking solver values against model rows.
pub const MODEL_TOLERANCE: f64 = 1e-6;

/// Deviations below this are treated as already aligned to a package size.
pub const QUANTIZATION_EPSILON: f64 = 1e-9;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default solver time limit in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 60;

/// Default weight of the distinct-ingredient count (alpha).
pub const DEFAULT_INGREDIENT_WEIGHT: f64 = 1.0;

/// Default weight of the on-hand usage reward (beta).
pub const DEFAULT_ON_HAND_WEIGHT: f64 = 10.0;

/// Default weight of the quantization slack (gamma).
pub const DEFAULT_QUANTIZATION_WEIGHT: f64 = 3.0;

/// Default penalty per repetition beyond the weekly cap in soft mode.
pub const DEFAULT_REPETITION_PENALTY: f64 = 100.0;

/// Default title of the carrier staple.
pub const DEFAULT_CARRIER_TITLE: &str = "plain rice";

/// Default staple kinds that count as a full meal.
pub const DEFAULT_FULL_MEAL_KINDS: [&str; 4] = ["rice-dish", "pasta", "curry", "hotpot"];

/// Energy factor (kcal/g) for a macro nutrient, if it is one.
pub fn energy_factor(nutrient: &str) -> Option<f64> {
    match nutrient {
        "protein" => Some(KCAL_PER_GRAM_PROTEIN),
        "carbohydrate" => Some(KCAL_PER_GRAM_CARBOHYDRATE),
        "fat" => Some(KCAL_PER_GRAM_FAT),
        _ => None,
    }
}
