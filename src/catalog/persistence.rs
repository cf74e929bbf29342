use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::RecipeCatalog;
use crate::error::{MenuError, Result};
use crate::models::{Ingredient, NutritionTarget, Recipe, WeekPlan};
use crate::planner::ShoppingList;

/// Reference data for a planning run, as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub targets: Vec<NutritionTarget>,
}

impl Dataset {
    pub fn catalog(&self) -> RecipeCatalog {
        RecipeCatalog::new(self.recipes.clone(), self.ingredients.clone())
    }
}

/// Load a dataset from a JSON file.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let content = fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&content)?;
    Ok(dataset)
}

/// Save a dataset to a JSON file.
pub fn save_dataset<P: AsRef<Path>>(path: P, dataset: &Dataset) -> Result<()> {
    let json = serde_json::to_string_pretty(dataset)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load on-hand quantities: a JSON object of ingredient name to grams.
///
/// Negative or non-finite quantities are rejected.
pub fn load_on_hand<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, f64>> {
    let content = fs::read_to_string(path)?;
    let on_hand: BTreeMap<String, f64> = serde_json::from_str(&content)?;
    if let Some((name, qty)) = on_hand.iter().find(|(_, q)| !q.is_finite() || **q < 0.0) {
        return Err(MenuError::InvalidInput(format!(
            "on-hand quantity for '{}' must be a non-negative number, got {}",
            name, qty
        )));
    }
    Ok(on_hand)
}

pub fn save_plan<P: AsRef<Path>>(path: P, plan: &WeekPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<WeekPlan> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write one row per dish: day, role, recipe id, title.
pub fn write_plan_csv<P: AsRef<Path>>(path: P, plan: &WeekPlan, catalog: &RecipeCatalog) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["day", "role", "recipe_id", "title"])?;

    for (i, day) in plan.days().iter().enumerate() {
        for (role, id) in day.dishes() {
            let title = catalog.get(id).map(|r| r.title.as_str()).unwrap_or("");
            wtr.write_record([
                (i + 1).to_string(),
                role.to_string(),
                id.to_string(),
                title.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write the shopping list: ingredient, grams, package size, packages.
pub fn write_shopping_csv<P: AsRef<Path>>(path: P, list: &ShoppingList) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["ingredient", "grams", "package_g", "packages"])?;

    for item in &list.items {
        wtr.write_record([
            item.name.clone(),
            format!("{:.1}", item.grams),
            item.unit.map(|u| format!("{:.0}", u)).unwrap_or_default(),
            item.packages.map(|p| p.to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
