use std::collections::BTreeMap;

use crate::catalog::RecipeCatalog;
use crate::models::{Role, WeekPlan};
use crate::planner::{CALORIE_KEY, ModelStats, NutrientBounds, PlanOutcome, ShoppingList, SolveStatus};

/// Display a week plan, one block per day.
pub fn display_week_plan(plan: &WeekPlan, catalog: &RecipeCatalog) {
    if plan.is_empty() {
        println!("No menu planned.");
        return;
    }

    println!();
    println!("=== Weekly Menu ===");

    let title_width = plan
        .recipe_ids()
        .filter_map(|id| catalog.get(id))
        .map(|r| r.title.len())
        .max()
        .unwrap_or(10);

    for (i, day) in plan.days().iter().enumerate() {
        println!();
        println!("Day {}", i + 1);
        for role in Role::ALL {
            match day.get(role).and_then(|id| catalog.get(id)) {
                Some(recipe) => println!(
                    "  {:<7} {:<width$}  {:>5.0} kcal",
                    role.as_str(),
                    recipe.title,
                    recipe.nutrient(CALORIE_KEY),
                    width = title_width
                ),
                None => println!("  {:<7} -", role.as_str()),
            }
        }
    }
    println!();
}

/// Display per-day totals of every bounded nutrient next to its bound.
pub fn display_nutrient_summary(plan: &WeekPlan, catalog: &RecipeCatalog, bounds: &NutrientBounds) {
    if bounds.is_empty() {
        return;
    }

    println!("--- Nutrients per day ---");
    for (nutrient, bound) in bounds.iter() {
        let totals: Vec<String> = plan
            .days()
            .iter()
            .map(|day| {
                let total: f64 = day
                    .dishes()
                    .filter_map(|(_, id)| catalog.get(id))
                    .map(|r| r.nutrient(nutrient))
                    .sum();
                format!("{:.1}", total)
            })
            .collect();
        let lo = bound.lower.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string());
        let hi = bound.upper.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string());
        println!("  {:<14} [{}, {}]  {}", nutrient, lo, hi, totals.join(" "));
    }
    println!();
}

/// Display the solve summary.
pub fn display_outcome(outcome: &PlanOutcome) {
    println!("--- Summary ---");
    if outcome.status == SolveStatus::TimeLimitFeasible {
        println!("Status: time limit reached (may not be optimal)");
    } else {
        println!("Status: optimal");
    }
    println!("Distinct ingredients: {}", outcome.distinct_ingredients);
    println!("Quantization slack: {:.1} g", outcome.quantization_slack);
    println!("Objective: {:.3}", outcome.objective);
    if outcome.repetition_penalty > 0.0 {
        println!("Repetition penalty: {:.3}", outcome.repetition_penalty);
    }
    println!("Solve time: {:.2?}", outcome.elapsed);
    println!();
}

pub fn display_model_stats(stats: &ModelStats) {
    println!(
        "Model: {} variables ({} binary), {} constraints, {} ingredients, {} quantized pairs",
        stats.variables, stats.binaries, stats.constraints, stats.ingredients, stats.quantized_pairs
    );
}

/// Display the aggregated shopping list.
pub fn display_shopping_list(list: &ShoppingList) {
    if list.items.is_empty() {
        println!("Shopping list: (empty)");
        return;
    }

    println!();
    println!("=== Shopping List ({} ingredients) ===", list.distinct_count());
    println!();

    let width = list.items.iter().map(|i| i.name.len()).max().unwrap_or(10);
    for item in &list.items {
        let packages = match (item.packages, item.unit) {
            (Some(n), Some(unit)) => format!("  {} x {:.0} g", n, unit),
            _ => String::new(),
        };
        println!("  {:<width$} {:>8.1} g{}", item.name, item.grams, packages, width = width);
    }

    println!();
    println!("Total: {:.0} g", list.total_grams());
    println!();
}

/// Display ingredient equivalence classes with more than one member.
pub fn display_classes(classes: &BTreeMap<&str, Vec<&str>>) {
    if classes.is_empty() {
        println!("No ingredient equivalences declared.");
        return;
    }

    println!();
    println!("=== Ingredient Classes ({}) ===", classes.len());
    println!();
    for (representative, members) in classes {
        println!("  {}: {}", representative, members.join(", "));
    }
    println!();
}
