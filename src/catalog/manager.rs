use std::collections::BTreeMap;

use crate::error::{MenuError, Result};
use crate::models::{Ingredient, Recipe, RecipeId, Role};
use crate::planner::IngredientResolver;

/// In-memory recipe and ingredient reference data for one planning run.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    /// Recipes keyed by id.
    recipes: BTreeMap<RecipeId, Recipe>,
    ingredients: Vec<Ingredient>,
}

impl RecipeCatalog {
    /// Create a catalog. Later recipes with a repeated id replace earlier ones.
    pub fn new(recipes: Vec<Recipe>, ingredients: Vec<Ingredient>) -> Self {
        let mut map = BTreeMap::new();
        for recipe in recipes {
            map.insert(recipe.id, recipe);
        }
        Self {
            recipes: map,
            ingredients,
        }
    }

    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(&id)
    }

    /// Get a recipe or fail with `RecipeNotFound`.
    pub fn require(&self, id: RecipeId) -> Result<&Recipe> {
        self.get(id).ok_or(MenuError::RecipeNotFound(id))
    }

    /// Count of candidates per role, every role present.
    pub fn role_counts(&self) -> BTreeMap<Role, usize> {
        let mut counts: BTreeMap<Role, usize> = Role::ALL.iter().map(|&r| (r, 0)).collect();
        for recipe in self.recipes.values() {
            *counts.entry(recipe.role).or_insert(0) += 1;
        }
        counts
    }

    /// All recipes in id order, cloned for a planning run.
    pub fn to_recipes(&self) -> Vec<Recipe> {
        self.recipes.values().cloned().collect()
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Resolver over every declared equivalence in the catalog.
    pub fn resolver(&self) -> IngredientResolver {
        IngredientResolver::from_ingredients(&self.ingredients)
    }

    /// Every raw ingredient name used by some recipe.
    pub fn raw_ingredient_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .recipes
            .values()
            .flat_map(|r| r.used_ingredients().map(|(n, _)| n))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: RecipeId, title: &str, role: Role, items: &[(&str, f64)]) -> Recipe {
        Recipe {
            id,
            title: title.to_string(),
            role,
            kind: None,
            nutrients: BTreeMap::new(),
            ingredients: items.iter().map(|(n, q)| (n.to_string(), Some(*q))).collect(),
        }
    }

    fn sample_catalog() -> RecipeCatalog {
        RecipeCatalog::new(
            vec![
                recipe(3, "Miso soup", Role::Soup, &[("tofu", 50.0), ("miso", 10.0)]),
                recipe(1, "plain rice", Role::Staple, &[("rice", 150.0)]),
                recipe(2, "Grilled fish", Role::Main, &[("salmon", 90.0), ("miso", 5.0)]),
            ],
            vec![],
        )
    }

    #[test]
    fn test_last_duplicate_wins() {
        let catalog = RecipeCatalog::new(
            vec![
                recipe(1, "old", Role::Side, &[]),
                recipe(1, "new", Role::Side, &[]),
            ],
            vec![],
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).unwrap().title, "new");
    }

    #[test]
    fn test_role_counts_include_empty_roles() {
        let counts = sample_catalog().role_counts();
        assert_eq!(counts[&Role::Staple], 1);
        assert_eq!(counts[&Role::Side], 0);
    }

    #[test]
    fn test_require_missing() {
        let catalog = sample_catalog();
        assert!(catalog.require(2).is_ok());
        assert!(matches!(catalog.require(99), Err(MenuError::RecipeNotFound(99))));
    }

    #[test]
    fn test_raw_names_deduplicated() {
        let catalog = sample_catalog();
        assert_eq!(catalog.raw_ingredient_names(), vec!["miso", "rice", "salmon", "tofu"]);
    }
}
