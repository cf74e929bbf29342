use serde::{Deserialize, Serialize};

/// Ingredient reference data: equivalent raw names and packaging multiples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    /// Raw names that denote the same ingredient.
    #[serde(default)]
    pub equivalents: Vec<String>,

    /// Unit sizes (grams) the ingredient is conventionally bought or used in.
    #[serde(default)]
    pub packaging: Vec<f64>,
}

impl Ingredient {
    /// The ingredient's own name followed by its declared equivalents.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.equivalents.iter().map(String::as_str))
    }

    /// Packaging sizes that are usable as multiples (finite and positive).
    pub fn valid_packaging(&self) -> impl Iterator<Item = f64> + '_ {
        self.packaging
            .iter()
            .copied()
            .filter(|w| w.is_finite() && *w > 0.0)
    }
}
