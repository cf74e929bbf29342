use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::RecipeCatalog;
use crate::config::PackagingUnit;
use crate::error::Result;
use crate::models::WeekPlan;
use crate::planner::equivalence::IngredientResolver;

/// One canonical ingredient needed for the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    pub grams: f64,
    /// Package size used for counting, when the ingredient declares one.
    pub unit: Option<f64>,
    /// Packages to buy: ceil(grams / unit).
    pub packages: Option<u32>,
}

/// Week-aggregate ingredient needs of a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShoppingList {
    pub items: Vec<ShoppingItem>,
}

impl ShoppingList {
    /// Number of distinct canonical ingredients.
    pub fn distinct_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_grams(&self) -> f64 {
        self.items.iter().map(|i| i.grams).sum()
    }

    pub fn get(&self, name: &str) -> Option<&ShoppingItem> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// Aggregate every dish of `plan` into canonical ingredient totals.
///
/// Repeated dishes count once per appearance.
pub fn summarize_plan(
    plan: &WeekPlan,
    catalog: &RecipeCatalog,
    resolver: &IngredientResolver,
    packaging: PackagingUnit,
) -> Result<ShoppingList> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for id in plan.recipe_ids() {
        let recipe = catalog.require(id)?;
        for (name, qty) in recipe.used_ingredients() {
            *totals
                .entry(resolver.canonicalize(name).to_string())
                .or_insert(0.0) += qty;
        }
    }

    let mut declared: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for ing in catalog.ingredients() {
        declared
            .entry(resolver.canonicalize(&ing.name).to_string())
            .or_default()
            .extend(ing.valid_packaging());
    }

    let items = totals
        .into_iter()
        .map(|(name, grams)| {
            let unit = declared
                .get(&name)
                .and_then(|units| packaging.pick(units.iter().copied()));
            let packages = unit.map(|w| (grams / w).ceil() as u32);
            ShoppingItem {
                name,
                grams,
                unit,
                packages,
            }
        })
        .collect();

    Ok(ShoppingList { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DAYS_PER_WEEK, DayMenu, Ingredient, Recipe, Role};

    fn recipe(id: u64, role: Role, items: &[(&str, f64)]) -> Recipe {
        Recipe {
            id,
            title: format!("r{}", id),
            role,
            kind: None,
            nutrients: BTreeMap::new(),
            ingredients: items.iter().map(|(n, q)| (n.to_string(), Some(*q))).collect(),
        }
    }

    #[test]
    fn test_summary_merges_equivalents_and_counts_packages() {
        let catalog = RecipeCatalog::new(
            vec![
                recipe(1, Role::Staple, &[("rice", 150.0)]),
                recipe(2, Role::Soup, &[("tofu", 100.0), ("leek", 10.0)]),
                recipe(3, Role::Main, &[("firm tofu", 150.0)]),
            ],
            vec![Ingredient {
                name: "tofu".to_string(),
                equivalents: vec!["firm tofu".to_string()],
                packaging: vec![300.0],
            }],
        );
        let resolver = catalog.resolver();

        let mut days = [DayMenu::default(); DAYS_PER_WEEK];
        days[0] = DayMenu {
            staple: Some(1),
            main: Some(3),
            side: None,
            soup: Some(2),
        };
        days[1] = DayMenu {
            staple: Some(1),
            ..Default::default()
        };
        let plan = WeekPlan::new(days);

        let list = summarize_plan(&plan, &catalog, &resolver, PackagingUnit::Smallest).unwrap();
        assert_eq!(list.distinct_count(), 3);
        assert_eq!(list.get("rice").unwrap().grams, 300.0);

        let tofu = list.get("firm tofu").unwrap();
        assert_eq!(tofu.grams, 250.0);
        assert_eq!(tofu.packages, Some(1));
        assert!(list.get("leek").unwrap().packages.is_none());
    }

    #[test]
    fn test_repeated_dish_counts_every_appearance() {
        let catalog = RecipeCatalog::new(
            vec![recipe(2, Role::Soup, &[("tofu", 100.0)])],
            vec![Ingredient {
                name: "tofu".to_string(),
                equivalents: vec![],
                packaging: vec![300.0],
            }],
        );
        let mut days = [DayMenu::default(); DAYS_PER_WEEK];
        for day in days.iter_mut().take(4) {
            day.soup = Some(2);
        }
        let plan = WeekPlan::new(days);

        let list = summarize_plan(&plan, &catalog, &catalog.resolver(), PackagingUnit::Smallest).unwrap();
        let tofu = list.get("tofu").unwrap();
        assert_eq!(tofu.grams, 400.0);
        assert_eq!(tofu.packages, Some(2));
    }

    #[test]
    fn test_unknown_recipe_fails() {
        let catalog = RecipeCatalog::default();
        let resolver = IngredientResolver::default();
        let mut days = [DayMenu::default(); DAYS_PER_WEEK];
        days[2].soup = Some(5);
        let plan = WeekPlan::new(days);
        assert!(summarize_plan(&plan, &catalog, &resolver, PackagingUnit::First).is_err());
    }
}
