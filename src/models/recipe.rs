use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a recipe in the catalog.
pub type RecipeId = u64;

/// A meal slot filled once per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staple,
    Main,
    Side,
    Soup,
}

impl Role {
    /// All roles in daily menu order.
    pub const ALL: [Role; 4] = [Role::Staple, Role::Main, Role::Side, Role::Soup];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staple => "staple",
            Role::Main => "main",
            Role::Side => "side",
            Role::Soup => "soup",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recipe with its nutrient profile and ingredient composition.
///
/// Nutrient values and ingredient quantities may be `null` in reference data;
/// accessors coerce missing values to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,

    pub title: String,

    pub role: Role,

    /// Secondary dish kind such as "rice-dish" or "pasta".
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub nutrients: BTreeMap<String, Option<f64>>,

    /// Raw ingredient name to quantity in grams.
    #[serde(default)]
    pub ingredients: BTreeMap<String, Option<f64>>,
}

impl Recipe {
    /// Nutrient value for `key`, zero when absent or null.
    #[inline]
    pub fn nutrient(&self, key: &str) -> f64 {
        self.nutrients
            .get(key)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Ingredients with a positive quantity, nulls coerced to zero and dropped.
    pub fn used_ingredients(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ingredients.iter().filter_map(|(name, qty)| {
            let qty = qty.filter(|q| q.is_finite()).unwrap_or(0.0);
            (qty > 0.0).then_some((name.as_str(), qty))
        })
    }

    /// Whether the secondary kind belongs to `kinds`.
    pub fn has_kind_in<'a>(&self, mut kinds: impl Iterator<Item = &'a String>) -> bool {
        match &self.kind {
            Some(kind) => kinds.any(|k| k == kind),
            None => false,
        }
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "#{} {} [{}{}], {} ingredients",
            self.id,
            self.title,
            self.role,
            self.kind
                .as_deref()
                .map(|k| format!("/{}", k))
                .unwrap_or_default(),
            self.used_ingredients().count()
        )
    }
}
