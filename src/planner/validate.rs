use std::collections::BTreeMap;

use crate::config::{ConstraintMode, EngineConfig};
use crate::error::{MenuError, Result};
use crate::models::{Recipe, RecipeId, Role, WeekPlan};
use crate::planner::bounds::NutrientBounds;
use crate::planner::constants::*;

fn defect(day: usize, msg: impl std::fmt::Display) -> MenuError {
    MenuError::PlanDefect(format!("day {}: {}", day + 1, msg))
}

/// Re-check an extracted plan against the hard rules it was built under.
///
/// Checks role composition, the suppression rule, the dishes-per-day range,
/// recipe roles, hard weekly caps and per-day nutrient bounds. Soft rules are
/// not checked.
pub fn verify_plan(
    plan: &WeekPlan,
    recipes: &[Recipe],
    bounds: &NutrientBounds,
    config: &EngineConfig,
) -> Result<()> {
    let by_id: BTreeMap<RecipeId, &Recipe> = recipes.iter().map(|r| (r.id, r)).collect();
    let suppressed = config.suppression.suppressed();
    let retained = config.suppression.retained();

    for (day, menu) in plan.days().iter().enumerate() {
        for (role, id) in menu.dishes() {
            let recipe = by_id.get(&id).ok_or(MenuError::RecipeNotFound(id))?;
            if recipe.role != role {
                return Err(defect(
                    day,
                    format!("recipe {} is a {} but fills {}", id, recipe.role, role),
                ));
            }
        }

        for role in [Role::Staple, Role::Soup, retained] {
            if menu.get(role).is_none() {
                return Err(defect(day, format!("no {}", role)));
            }
        }

        let full_meal = menu
            .staple
            .and_then(|id| by_id.get(&id))
            .is_some_and(|r| r.has_kind_in(config.full_meal_kinds.iter()));
        match (full_meal, menu.get(suppressed).is_some()) {
            (true, true) => {
                return Err(defect(day, format!("{} served with a full-meal staple", suppressed)));
            }
            (false, false) => return Err(defect(day, format!("no {}", suppressed))),
            _ => {}
        }

        let dishes = menu.dish_count() as f64;
        if !(MIN_DISHES_PER_DAY..=MAX_DISHES_PER_DAY).contains(&dishes) {
            return Err(defect(day, format!("{} dishes", dishes)));
        }

        for (nutrient, bound) in bounds.iter() {
            let total: f64 = menu
                .dishes()
                .filter_map(|(_, id)| by_id.get(&id))
                .map(|r| r.nutrient(nutrient))
                .sum();
            let tolerance = VERIFY_TOLERANCE * total.abs().max(1.0);
            if !bound.contains(total, tolerance) {
                return Err(defect(
                    day,
                    format!(
                        "{} = {:.3} outside [{:?}, {:?}]",
                        nutrient, total, bound.lower, bound.upper
                    ),
                ));
            }
        }
    }

    if config.repetition == ConstraintMode::Hard {
        let carrier = config.carrier_title.trim();
        for recipe in recipes {
            let cap = if recipe.title.trim() == carrier && recipe.role == Role::Staple {
                CARRIER_WEEKLY_CAP
            } else {
                ORDINARY_WEEKLY_CAP
            };
            let count = plan.occurrences(recipe.id);
            if count as f64 > cap {
                return Err(MenuError::PlanDefect(format!(
                    "recipe {} served {} times, cap is {}",
                    recipe.id, count, cap
                )));
            }
        }
    }

    Ok(())
}
