pub mod bounds;
pub mod builder;
pub mod constants;
pub mod engine;
pub mod equivalence;
pub mod extract;
pub mod model;
pub mod shopping;
pub mod solver;
pub mod targets;
pub mod validate;

pub use bounds::{Bound, NutrientBounds, calorie_band, convert_bounds, macro_grams};
pub use builder::{BuildInput, MenuModel, ModelStats, Selection, build_model};
pub use constants::*;
pub use engine::{PlanOutcome, PlanRequest, PreparedModel, plan_week, prepare_model, solve_prepared};
pub use equivalence::IngredientResolver;
pub use extract::extract_plan;
pub use model::{LinearExpr, MilpModel, Sense, VarId, VarKind};
pub use shopping::{ShoppingItem, ShoppingList, summarize_plan};
pub use solver::{MicroLpSolver, MilpSolver, SolveStatus, SolverOutput};
pub use targets::{lookup_key, select_target};
pub use validate::verify_plan;
