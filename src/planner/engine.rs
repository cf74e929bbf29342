use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::config::EngineConfig;
use crate::error::{MenuError, Result};
use crate::models::{Ingredient, NutritionTarget, Recipe, UserProfile, WeekPlan};
use crate::planner::bounds::{NutrientBounds, convert_bounds};
use crate::planner::builder::{BuildInput, MenuModel, ModelStats, build_model};
use crate::planner::constants::MODEL_TOLERANCE;
use crate::planner::equivalence::IngredientResolver;
use crate::planner::extract::extract_plan;
use crate::planner::solver::{MilpSolver, SolveStatus};
use crate::planner::targets::select_target;
use crate::planner::validate::verify_plan;

/// Inputs of one weekly planning run.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub profile: &'a UserProfile,
    pub recipes: &'a [Recipe],
    pub ingredients: &'a [Ingredient],
    pub targets: &'a [NutritionTarget],
    /// Raw ingredient name to grams on hand.
    pub on_hand: &'a BTreeMap<String, f64>,
    pub config: &'a EngineConfig,
}

/// A built model together with what it was built from.
#[derive(Debug, Clone)]
pub struct PreparedModel {
    pub bounds: NutrientBounds,
    pub resolver: IngredientResolver,
    pub menu: MenuModel,
}

/// Result of a successful planning run.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    pub plan: WeekPlan,
    #[serde(skip)]
    pub status: SolveStatus,
    /// Ingredient count, on-hand reward and quantization slack, weighted.
    pub objective: f64,
    /// Soft repetition overflow priced at `repetition_penalty`, kept out of
    /// `objective`.
    pub repetition_penalty: f64,
    pub distinct_ingredients: usize,
    pub quantization_slack: f64,
    #[serde(skip)]
    pub stats: ModelStats,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Resolve the target, convert its bounds and build the model.
///
/// Everything here is validation; no solver is involved.
pub fn prepare_model(request: &PlanRequest<'_>) -> Result<PreparedModel> {
    let config = request.config;
    config.validate()?;

    let target = select_target(request.profile, request.targets)?;
    debug!(profile = %target.profile, "selected nutrition target");

    let bounds = convert_bounds(target, request.profile.menstruating, config.formulation)?;
    info!(
        nutrients = bounds.len(),
        calorie_target = ?bounds.calorie_target,
        "converted nutrient bounds"
    );

    let resolver = IngredientResolver::from_ingredients(request.ingredients);
    debug!(classes = resolver.class_count(), "resolved ingredient equivalences");

    let menu = build_model(&BuildInput {
        recipes: request.recipes,
        ingredients: request.ingredients,
        resolver: &resolver,
        bounds: &bounds,
        on_hand: request.on_hand,
        config,
    })?;

    Ok(PreparedModel {
        bounds,
        resolver,
        menu,
    })
}

/// Plan one week: build, solve, extract and verify.
pub fn plan_week<S: MilpSolver + ?Sized>(request: &PlanRequest<'_>, solver: &S) -> Result<PlanOutcome> {
    let span = info_span!("plan_week", recipes = request.recipes.len());
    let _guard = span.enter();

    let prepared = prepare_model(request)?;
    solve_prepared(request, &prepared, solver)
}

/// Solve an already prepared model and read the week plan back.
pub fn solve_prepared<S: MilpSolver + ?Sized>(
    request: &PlanRequest<'_>,
    prepared: &PreparedModel,
    solver: &S,
) -> Result<PlanOutcome> {
    let menu = &prepared.menu;

    let output = solver.solve(&menu.model, request.config.time_limit())?;
    if output.status == SolveStatus::TimeLimitFeasible {
        warn!("time limit reached, returning the best plan found so far");
    }

    let violated = menu.model.violations(&output.values, MODEL_TOLERANCE);
    if !violated.is_empty() {
        return Err(MenuError::PlanDefect(format!(
            "solution violates {} constraint(s): {}",
            violated.len(),
            violated.join(", ")
        )));
    }

    let plan = extract_plan(&menu.selections, &output.values);
    verify_plan(&plan, request.recipes, &prepared.bounds, request.config)?;

    let distinct_ingredients = menu.distinct_ingredients(&output.values);
    let quantization_slack = menu.total_quantization_slack(&output.values);
    let repetition_penalty =
        request.config.weights.repetition_penalty * menu.total_repetition_excess(&output.values);
    let objective = output.objective - repetition_penalty;
    info!(
        objective,
        repetition_penalty,
        distinct_ingredients,
        quantization_slack,
        elapsed = ?output.elapsed,
        "week planned"
    );

    Ok(PlanOutcome {
        plan,
        status: output.status,
        objective,
        repetition_penalty,
        distinct_ingredients,
        quantization_slack,
        stats: menu.stats,
        elapsed: output.elapsed,
    })
}
