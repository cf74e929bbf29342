use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::config::{ConstraintMode, EngineConfig, OnHandMode};
use crate::error::{MenuError, Result};
use crate::models::{DAYS_PER_WEEK, Ingredient, Recipe, RecipeId, Role};
use crate::planner::bounds::NutrientBounds;
use crate::planner::constants::*;
use crate::planner::equivalence::IngredientResolver;
use crate::planner::model::{LinearExpr, MilpModel, Sense, VarId, VarKind};

/// Everything the builder reads. All of it is already materialized.
#[derive(Debug, Clone, Copy)]
pub struct BuildInput<'a> {
    pub recipes: &'a [Recipe],
    pub ingredients: &'a [Ingredient],
    pub resolver: &'a IngredientResolver,
    pub bounds: &'a NutrientBounds,
    /// Raw ingredient name to grams on hand. Empty when not tracked.
    pub on_hand: &'a BTreeMap<String, f64>,
    pub config: &'a EngineConfig,
}

/// Binary `selected[day, recipe, role]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub day: usize,
    pub recipe: RecipeId,
    pub role: Role,
    pub var: VarId,
}

/// Variables created for one canonical ingredient.
#[derive(Debug, Clone)]
pub struct IngredientVars {
    /// Week-aggregate grams used.
    pub usage: VarId,
    /// 1 if the ingredient is used at all this week.
    pub used: VarId,
    /// Linking constant: maximum feasible weekly usage.
    pub big_m: f64,
    /// Grams left over from the on-hand quantity, when accounted.
    pub leftover: Option<VarId>,
}

/// Size of a built model, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
    pub variables: usize,
    pub binaries: usize,
    pub constraints: usize,
    pub ingredients: usize,
    pub quantized_pairs: usize,
}

/// A built menu model and the handles needed to read a solution back.
#[derive(Debug, Clone)]
pub struct MenuModel {
    pub model: MilpModel,
    pub selections: Vec<Selection>,
    /// Keyed by canonical ingredient name.
    pub ingredients: BTreeMap<String, IngredientVars>,
    pub quantization_slack: Vec<VarId>,
    /// Soft repetition overflow per recipe.
    pub repetition_excess: BTreeMap<RecipeId, VarId>,
    pub stats: ModelStats,
}

impl MenuModel {
    /// Number of distinct ingredients used under `values`.
    pub fn distinct_ingredients(&self, values: &[f64]) -> usize {
        self.ingredients
            .values()
            .filter(|v| values.get(v.used.index()).copied().unwrap_or(0.0) >= SELECTION_THRESHOLD)
            .count()
    }

    /// Total quantization slack under `values`.
    pub fn total_quantization_slack(&self, values: &[f64]) -> f64 {
        self.quantization_slack
            .iter()
            .map(|v| values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Total soft repetition overflow under `values`. Zero in hard mode.
    pub fn total_repetition_excess(&self, values: &[f64]) -> f64 {
        self.repetition_excess
            .values()
            .map(|v| values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Recipes grouped for the builder.
struct Candidates<'a> {
    by_role: BTreeMap<Role, Vec<&'a Recipe>>,
    full_meal_staples: BTreeSet<RecipeId>,
    carriers: BTreeSet<RecipeId>,
}

impl<'a> Candidates<'a> {
    fn new(recipes: &'a [Recipe], config: &EngineConfig) -> Result<Self> {
        let mut by_role: BTreeMap<Role, Vec<&Recipe>> = BTreeMap::new();
        let mut seen = BTreeSet::new();
        for recipe in recipes {
            if !seen.insert(recipe.id) {
                return Err(MenuError::InvalidInput(format!(
                    "duplicate recipe id {}",
                    recipe.id
                )));
            }
            by_role.entry(recipe.role).or_default().push(recipe);
        }
        for list in by_role.values_mut() {
            list.sort_by_key(|r| r.id);
        }

        let staples = by_role.get(&Role::Staple).map(Vec::as_slice).unwrap_or(&[]);
        let full_meal_staples = staples
            .iter()
            .filter(|r| r.has_kind_in(config.full_meal_kinds.iter()))
            .inspect(|r| debug!(recipe = %r.debug_string(), "full-meal staple"))
            .map(|r| r.id)
            .collect();
        let carrier_title = config.carrier_title.trim();
        let carriers = staples
            .iter()
            .filter(|r| r.title.trim() == carrier_title)
            .map(|r| r.id)
            .collect();

        Ok(Self {
            by_role,
            full_meal_staples,
            carriers,
        })
    }

    fn of(&self, role: Role) -> &[&'a Recipe] {
        self.by_role.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fail with the first required role that has no candidates.
    ///
    /// The suppressible role is only required when some staple is not a
    /// full meal, since otherwise every day suppresses it.
    fn check_coverage(&self, config: &EngineConfig) -> Result<()> {
        let suppressed = config.suppression.suppressed();
        let some_plain_staple = self
            .of(Role::Staple)
            .iter()
            .any(|r| !self.full_meal_staples.contains(&r.id));

        for role in Role::ALL {
            let required = role != suppressed || some_plain_staple;
            if required && self.of(role).is_empty() {
                return Err(MenuError::RoleEmpty(role));
            }
        }
        Ok(())
    }

    fn weekly_cap(&self, recipe: RecipeId) -> f64 {
        if self.carriers.contains(&recipe) {
            CARRIER_WEEKLY_CAP
        } else {
            ORDINARY_WEEKLY_CAP
        }
    }
}

/// Canonical ingredient composition of each recipe, equivalent raw names summed.
fn canonical_compositions(
    recipes: &[Recipe],
    resolver: &IngredientResolver,
) -> BTreeMap<RecipeId, BTreeMap<String, f64>> {
    recipes
        .iter()
        .map(|recipe| {
            let mut composition: BTreeMap<String, f64> = BTreeMap::new();
            for (name, qty) in recipe.used_ingredients() {
                *composition
                    .entry(resolver.canonicalize(name).to_string())
                    .or_insert(0.0) += qty;
            }
            (recipe.id, composition)
        })
        .collect()
}

/// Packaging unit per canonical ingredient, chosen by the configured policy.
fn packaging_units(
    ingredients: &[Ingredient],
    resolver: &IngredientResolver,
    config: &EngineConfig,
) -> BTreeMap<String, f64> {
    let mut declared: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for ing in ingredients {
        declared
            .entry(resolver.canonicalize(&ing.name).to_string())
            .or_default()
            .extend(ing.valid_packaging());
    }
    declared
        .into_iter()
        .filter_map(|(name, units)| config.packaging_unit.pick(units).map(|w| (name, w)))
        .collect()
}

/// Distance from `amount` to the nearest multiple of `unit`.
pub fn quantization_deviation(amount: f64, unit: f64) -> f64 {
    let nearest = unit * (amount / unit).round();
    (amount - nearest).abs()
}

/// Build the weekly menu model.
///
/// Fails with [`MenuError::RoleEmpty`] before creating any variable when a
/// required role has no candidate recipe.
pub fn build_model(input: &BuildInput<'_>) -> Result<MenuModel> {
    let config = input.config;
    let candidates = Candidates::new(input.recipes, config)?;
    candidates.check_coverage(config)?;

    let mut model = MilpModel::new();
    let days = 0..DAYS_PER_WEEK;

    // selected[day, recipe, role]; each recipe only fills its own role
    let mut selections = Vec::new();
    let mut selected: BTreeMap<(usize, RecipeId), VarId> = BTreeMap::new();
    for day in days.clone() {
        for role in Role::ALL {
            for recipe in candidates.of(role) {
                let var = model.add_var(
                    format!("x_d{}_r{}_{}", day + 1, recipe.id, role),
                    VarKind::Binary,
                );
                selections.push(Selection {
                    day,
                    recipe: recipe.id,
                    role,
                    var,
                });
                selected.insert((day, recipe.id), var);
            }
        }
    }
    let x = |day: usize, recipe: RecipeId| selected[&(day, recipe)];
    let role_sum = |day: usize, role: Role| {
        LinearExpr::sum(candidates.of(role).iter().map(|r| x(day, r.id)))
    };

    add_composition(&mut model, &candidates, config, role_sum, x);
    add_repetition(&mut model, &candidates, config, &x);
    add_nutrients(&mut model, &candidates, input.bounds, &x);

    // Ingredient usage, linking, quantization
    let compositions = canonical_compositions(input.recipes, input.resolver);
    let all_ingredients: BTreeSet<&str> = compositions
        .values()
        .flat_map(|c| c.keys().map(String::as_str))
        .collect();

    let on_hand = canonical_on_hand(input.on_hand, input.resolver);
    for name in on_hand.keys() {
        if !all_ingredients.contains(name.as_str()) {
            match config.on_hand {
                OnHandMode::Exact => {
                    return Err(MenuError::InvalidInput(format!(
                        "on-hand ingredient '{}' is not used by any recipe",
                        name
                    )));
                }
                OnHandMode::Leftover => {
                    warn!(ingredient = %name, "on-hand ingredient is not used by any recipe");
                }
            }
        }
    }

    let repetition_soft = config.repetition == ConstraintMode::Soft;
    let mut ingredients = BTreeMap::new();
    for (k, &name) in all_ingredients.iter().enumerate() {
        let usage = model.add_var(format!("usage_{}", k), VarKind::non_negative());
        let used = model.add_var(format!("used_{}", k), VarKind::Binary);

        let mut usage_expr = LinearExpr::term(usage, 1.0);
        let mut big_m = 0.0;
        for recipe in input.recipes {
            let Some(&qty) = compositions[&recipe.id].get(name) else {
                continue;
            };
            for day in days.clone() {
                usage_expr.add_term(x(day, recipe.id), -qty);
            }
            let cap = if repetition_soft {
                DAYS_PER_WEEK as f64
            } else {
                candidates.weekly_cap(recipe.id)
            };
            big_m += qty * cap;
        }
        model.add_constraint(format!("usage_def_{}", k), usage_expr, Sense::Eq, 0.0);

        let mut link = LinearExpr::term(usage, 1.0);
        link.add_term(used, -big_m);
        model.add_constraint(format!("used_link_{}", k), link, Sense::Le, 0.0);
        model.add_objective_term(used, config.weights.ingredient);

        let leftover = on_hand
            .get(name)
            .and_then(|&required| add_on_hand(&mut model, config, k, usage, required));

        ingredients.insert(
            name.to_string(),
            IngredientVars {
                usage,
                used,
                big_m,
                leftover,
            },
        );
    }

    let units = packaging_units(input.ingredients, input.resolver, config);
    let ingredient_index: BTreeMap<&str, usize> = all_ingredients
        .iter()
        .enumerate()
        .map(|(k, &n)| (n, k))
        .collect();
    let mut quantization_slack = Vec::new();
    let mut quantized_pairs = 0;
    for recipe in input.recipes {
        for (name, &amount) in &compositions[&recipe.id] {
            let Some(&unit) = units.get(name) else {
                continue;
            };
            let deviation = quantization_deviation(amount, unit);
            if deviation < QUANTIZATION_EPSILON {
                continue;
            }
            quantized_pairs += 1;
            let k = ingredient_index[name.as_str()];
            for day in days.clone() {
                let xv = x(day, recipe.id);
                let tag = format!("d{}_r{}_i{}", day + 1, recipe.id, k);
                match config.quantization {
                    ConstraintMode::Soft => {
                        let slack =
                            model.add_var(format!("qslack_{}", tag), VarKind::non_negative());
                        // slack >= deviation * selected
                        let mut e = LinearExpr::term(slack, 1.0);
                        e.add_term(xv, -deviation);
                        model.add_constraint(format!("quant_{}", tag), e, Sense::Ge, 0.0);
                        model.add_objective_term(slack, config.weights.quantization);
                        quantization_slack.push(slack);
                    }
                    ConstraintMode::Hard => {
                        model.add_constraint(
                            format!("quant_{}", tag),
                            LinearExpr::term(xv, deviation),
                            Sense::Le,
                            0.0,
                        );
                    }
                }
            }
        }
    }

    let mut repetition_excess = BTreeMap::new();
    if repetition_soft {
        repetition_excess = add_soft_repetition(&mut model, &candidates, config, &x);
    }

    let stats = ModelStats {
        variables: model.variables().len(),
        binaries: model.binary_count(),
        constraints: model.constraints().len(),
        ingredients: ingredients.len(),
        quantized_pairs,
    };
    info!(
        variables = stats.variables,
        binaries = stats.binaries,
        constraints = stats.constraints,
        ingredients = stats.ingredients,
        "built menu model"
    );

    Ok(MenuModel {
        model,
        selections,
        ingredients,
        quantization_slack,
        repetition_excess,
        stats,
    })
}

/// Daily role composition and dishes-per-day range.
fn add_composition(
    model: &mut MilpModel,
    candidates: &Candidates<'_>,
    config: &EngineConfig,
    role_sum: impl Fn(usize, Role) -> LinearExpr,
    x: impl Fn(usize, RecipeId) -> VarId,
) {
    let suppressed = config.suppression.suppressed();
    let retained = config.suppression.retained();

    for day in 0..DAYS_PER_WEEK {
        let d = day + 1;
        model.add_constraint(format!("staple_d{}", d), role_sum(day, Role::Staple), Sense::Eq, 1.0);
        model.add_constraint(format!("soup_d{}", d), role_sum(day, Role::Soup), Sense::Eq, 1.0);
        model.add_constraint(
            format!("{}_d{}", retained, d),
            role_sum(day, retained),
            Sense::Eq,
            1.0,
        );

        // suppressed + full_meal_staple = 1
        let mut e = role_sum(day, suppressed);
        for &id in &candidates.full_meal_staples {
            e.add_term(x(day, id), 1.0);
        }
        model.add_constraint(format!("{}_d{}", suppressed, d), e, Sense::Eq, 1.0);

        let mut all = LinearExpr::new();
        for role in Role::ALL {
            all.add_expr(&role_sum(day, role), 1.0);
        }
        model.add_range(
            &format!("dishes_d{}", d),
            all,
            Some(MIN_DISHES_PER_DAY),
            Some(MAX_DISHES_PER_DAY),
        );
    }
}

/// Hard weekly repetition caps. Soft mode is added separately.
fn add_repetition(
    model: &mut MilpModel,
    candidates: &Candidates<'_>,
    config: &EngineConfig,
    x: &impl Fn(usize, RecipeId) -> VarId,
) {
    if config.repetition != ConstraintMode::Hard {
        return;
    }
    for role in Role::ALL {
        for recipe in candidates.of(role) {
            let e = LinearExpr::sum((0..DAYS_PER_WEEK).map(|d| x(d, recipe.id)));
            model.add_constraint(
                format!("repeat_r{}", recipe.id),
                e,
                Sense::Le,
                candidates.weekly_cap(recipe.id),
            );
        }
    }
}

/// sum(selected) - excess <= cap, with the excess priced in the objective.
fn add_soft_repetition(
    model: &mut MilpModel,
    candidates: &Candidates<'_>,
    config: &EngineConfig,
    x: &impl Fn(usize, RecipeId) -> VarId,
) -> BTreeMap<RecipeId, VarId> {
    let mut excess = BTreeMap::new();
    for role in Role::ALL {
        for recipe in candidates.of(role) {
            let cap = candidates.weekly_cap(recipe.id);
            if cap >= DAYS_PER_WEEK as f64 {
                continue;
            }
            let over = model.add_var(format!("excess_r{}", recipe.id), VarKind::non_negative());
            let mut e = LinearExpr::sum((0..DAYS_PER_WEEK).map(|d| x(d, recipe.id)));
            e.add_term(over, -1.0);
            model.add_constraint(format!("repeat_r{}", recipe.id), e, Sense::Le, cap);
            model.add_objective_term(over, config.weights.repetition_penalty);
            excess.insert(recipe.id, over);
        }
    }
    excess
}

/// Per-day nutrient sums within their converted bounds.
fn add_nutrients(
    model: &mut MilpModel,
    candidates: &Candidates<'_>,
    bounds: &NutrientBounds,
    x: &impl Fn(usize, RecipeId) -> VarId,
) {
    for (nutrient, bound) in bounds.iter() {
        if bound.is_open() {
            continue;
        }
        let mut any_source = false;
        for day in 0..DAYS_PER_WEEK {
            let mut e = LinearExpr::new();
            for role in Role::ALL {
                for recipe in candidates.of(role) {
                    e.add_term(x(day, recipe.id), recipe.nutrient(nutrient));
                }
            }
            any_source |= !e.is_empty();
            model.add_range(
                &format!("nut_{}_d{}", sanitize(nutrient), day + 1),
                e,
                bound.lower,
                bound.upper,
            );
        }
        if !any_source {
            warn!(nutrient = %nutrient, "no recipe supplies this bounded nutrient");
        }
        debug!(nutrient = %nutrient, lower = ?bound.lower, upper = ?bound.upper, "nutrient bound");
    }
}

/// Sum on-hand quantities per canonical name, dropping non-positive entries.
fn canonical_on_hand(
    on_hand: &BTreeMap<String, f64>,
    resolver: &IngredientResolver,
) -> BTreeMap<String, f64> {
    let mut merged: BTreeMap<String, f64> = BTreeMap::new();
    for (name, &qty) in on_hand {
        if qty.is_finite() && qty > 0.0 {
            *merged
                .entry(resolver.canonicalize(name).to_string())
                .or_insert(0.0) += qty;
        }
    }
    merged
}

/// On-hand accounting for ingredient `k`; returns the leftover variable in
/// leftover mode.
fn add_on_hand(
    model: &mut MilpModel,
    config: &EngineConfig,
    k: usize,
    usage: VarId,
    required: f64,
) -> Option<VarId> {
    // Reward the fraction of the on-hand quantity consumed
    model.add_objective_term(usage, -config.weights.on_hand / required);
    match config.on_hand {
        OnHandMode::Exact => {
            model.add_constraint(
                format!("on_hand_{}", k),
                LinearExpr::term(usage, 1.0),
                Sense::Eq,
                required,
            );
            None
        }
        OnHandMode::Leftover => {
            let leftover = model.add_var(format!("leftover_{}", k), VarKind::non_negative());
            let mut e = LinearExpr::term(usage, 1.0);
            e.add_term(leftover, 1.0);
            model.add_constraint(format!("on_hand_{}", k), e, Sense::Eq, required);
            Some(leftover)
        }
    }
}

/// LP-safe identifier fragment.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuppressionPolicy;
    use crate::planner::bounds::Bound;

    fn recipe(id: RecipeId, title: &str, role: Role, kind: Option<&str>, items: &[(&str, f64)]) -> Recipe {
        Recipe {
            id,
            title: title.to_string(),
            role,
            kind: kind.map(str::to_string),
            nutrients: BTreeMap::from([("calorie".to_string(), Some(500.0))]),
            ingredients: items.iter().map(|(n, q)| (n.to_string(), Some(*q))).collect(),
        }
    }

    fn catalog() -> Vec<Recipe> {
        vec![
            recipe(1, "plain rice", Role::Staple, None, &[("rice", 150.0)]),
            recipe(2, "curry rice", Role::Staple, Some("curry"), &[("rice", 150.0), ("pork", 80.0)]),
            recipe(10, "ginger pork", Role::Main, None, &[("pork", 100.0)]),
            recipe(20, "spinach salad", Role::Side, None, &[("spinach", 60.0)]),
            recipe(30, "miso soup", Role::Soup, None, &[("tofu", 50.0)]),
        ]
    }

    fn build(recipes: &[Recipe], config: &EngineConfig) -> Result<MenuModel> {
        let resolver = IngredientResolver::default();
        let bounds = NutrientBounds::default();
        let on_hand = BTreeMap::new();
        build_model(&BuildInput {
            recipes,
            ingredients: &[],
            resolver: &resolver,
            bounds: &bounds,
            on_hand: &on_hand,
            config,
        })
    }

    #[test]
    fn test_empty_soup_role_fails() {
        let recipes: Vec<Recipe> = catalog().into_iter().filter(|r| r.role != Role::Soup).collect();
        let err = build(&recipes, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, MenuError::RoleEmpty(Role::Soup)));
    }

    #[test]
    fn test_main_optional_when_all_staples_full_meal() {
        let recipes: Vec<Recipe> = catalog()
            .into_iter()
            .filter(|r| r.role != Role::Main && r.id != 1)
            .collect();
        assert!(build(&recipes, &EngineConfig::default()).is_ok());

        let config = EngineConfig {
            suppression: SuppressionPolicy::Side,
            ..Default::default()
        };
        let err = build(&recipes, &config).unwrap_err();
        assert!(matches!(err, MenuError::RoleEmpty(Role::Main)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut recipes = catalog();
        recipes.push(recipe(30, "dup", Role::Soup, None, &[]));
        assert!(matches!(
            build(&recipes, &EngineConfig::default()),
            Err(MenuError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_selection_vars_per_day_and_recipe() {
        let m = build(&catalog(), &EngineConfig::default()).unwrap();
        assert_eq!(m.selections.len(), DAYS_PER_WEEK * 5);
        assert!(m.selections.iter().all(|s| s.day < DAYS_PER_WEEK));
        assert_eq!(m.ingredients.len(), 4);
    }

    #[test]
    fn test_big_m_per_ingredient() {
        let m = build(&catalog(), &EngineConfig::default()).unwrap();
        // rice: carrier 150 x 7 + curry 150 x 1
        assert_eq!(m.ingredients["rice"].big_m, 1200.0);
        // pork: curry 80 x 1 + main 100 x 1
        assert_eq!(m.ingredients["pork"].big_m, 180.0);
    }

    #[test]
    fn test_carrier_cap_is_seven() {
        let m = build(&catalog(), &EngineConfig::default()).unwrap();
        let carrier = m
            .model
            .constraints()
            .iter()
            .find(|c| c.name == "repeat_r1")
            .unwrap();
        assert_eq!(carrier.rhs, CARRIER_WEEKLY_CAP);
        let ordinary = m
            .model
            .constraints()
            .iter()
            .find(|c| c.name == "repeat_r10")
            .unwrap();
        assert_eq!(ordinary.rhs, ORDINARY_WEEKLY_CAP);
    }

    #[test]
    fn test_soft_repetition_adds_excess() {
        let config = EngineConfig {
            repetition: ConstraintMode::Soft,
            ..Default::default()
        };
        let m = build(&catalog(), &config).unwrap();
        // Every recipe but the carrier gets an overflow variable
        assert_eq!(m.repetition_excess.len(), 4);
        assert!(!m.repetition_excess.contains_key(&1));
        assert_eq!(m.ingredients["pork"].big_m, 180.0 * 7.0);
    }

    #[test]
    fn test_nutrient_rows_per_day() {
        let resolver = IngredientResolver::default();
        let target = crate::models::NutritionTarget {
            profile: crate::models::ProfileKey {
                age_bracket: "30-49".to_string(),
                sex: crate::models::Sex::Male,
                activity: crate::models::ActivityLevel::Low,
            },
            bounds: BTreeMap::from([("calorie".to_string(), 2000.0)]),
        };
        let bounds = crate::planner::bounds::convert_bounds(
            &target,
            false,
            crate::config::Formulation::Full,
        )
        .unwrap();
        assert_eq!(bounds.get("calorie"), Some(&Bound::between(1800.0, 2200.0)));

        let config = EngineConfig::default();
        let on_hand = BTreeMap::new();
        let recipes = catalog();
        let m = build_model(&BuildInput {
            recipes: &recipes,
            ingredients: &[],
            resolver: &resolver,
            bounds: &bounds,
            on_hand: &on_hand,
            config: &config,
        })
        .unwrap();
        let rows = m
            .model
            .constraints()
            .iter()
            .filter(|c| c.name.starts_with("nut_calorie_"))
            .count();
        assert_eq!(rows, DAYS_PER_WEEK * 2);
    }

    #[test]
    fn test_quantization_soft_and_hard() {
        let resolver = IngredientResolver::default();
        let bounds = NutrientBounds::default();
        let on_hand = BTreeMap::new();
        let recipes = catalog();
        let ingredients = vec![Ingredient {
            name: "tofu".to_string(),
            equivalents: vec![],
            packaging: vec![300.0, 150.0],
        }];

        let soft = EngineConfig::default();
        let m = build_model(&BuildInput {
            recipes: &recipes,
            ingredients: &ingredients,
            resolver: &resolver,
            bounds: &bounds,
            on_hand: &on_hand,
            config: &soft,
        })
        .unwrap();
        // 50g vs nearest multiple of 150 (0) deviates by 50 on every day
        assert_eq!(m.stats.quantized_pairs, 1);
        assert_eq!(m.quantization_slack.len(), DAYS_PER_WEEK);

        let hard = EngineConfig {
            quantization: ConstraintMode::Hard,
            ..Default::default()
        };
        let m = build_model(&BuildInput {
            recipes: &recipes,
            ingredients: &ingredients,
            resolver: &resolver,
            bounds: &bounds,
            on_hand: &on_hand,
            config: &hard,
        })
        .unwrap();
        assert!(m.quantization_slack.is_empty());
        let rows = m
            .model
            .constraints()
            .iter()
            .filter(|c| c.name.starts_with("quant_"))
            .count();
        assert_eq!(rows, DAYS_PER_WEEK);
    }

    #[test]
    fn test_quantization_deviation() {
        assert_eq!(quantization_deviation(300.0, 150.0), 0.0);
        assert_eq!(quantization_deviation(200.0, 150.0), 50.0);
        assert_eq!(quantization_deviation(50.0, 150.0), 50.0);
    }

    #[test]
    fn test_on_hand_exact_unknown_ingredient_fails() {
        let resolver = IngredientResolver::default();
        let bounds = NutrientBounds::default();
        let on_hand = BTreeMap::from([("saffron".to_string(), 2.0)]);
        let recipes = catalog();
        let config = EngineConfig {
            on_hand: OnHandMode::Exact,
            ..Default::default()
        };
        let err = build_model(&BuildInput {
            recipes: &recipes,
            ingredients: &[],
            resolver: &resolver,
            bounds: &bounds,
            on_hand: &on_hand,
            config: &config,
        })
        .unwrap_err();
        assert!(matches!(err, MenuError::InvalidInput(_)));
    }

    #[test]
    fn test_on_hand_leftover_var() {
        let resolver = IngredientResolver::from_groups([["tofu", "firm tofu"]]);
        let bounds = NutrientBounds::default();
        let on_hand = BTreeMap::from([("tofu".to_string(), 300.0), ("firm tofu".to_string(), 100.0)]);
        let recipes = catalog();
        let config = EngineConfig::default();
        let m = build_model(&BuildInput {
            recipes: &recipes,
            ingredients: &[],
            resolver: &resolver,
            bounds: &bounds,
            on_hand: &on_hand,
            config: &config,
        })
        .unwrap();
        // Both raw names resolve to "firm tofu", quantities summed
        let vars = &m.ingredients["firm tofu"];
        assert!(vars.leftover.is_some());
        let row = m
            .model
            .constraints()
            .iter()
            .find(|c| c.name.starts_with("on_hand_"))
            .unwrap();
        assert_eq!(row.rhs, 400.0);
    }
}
