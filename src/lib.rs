pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;

pub use config::EngineConfig;
pub use error::{MenuError, Result};
pub use models::{Ingredient, NutritionTarget, Recipe, RecipeId, Role, UserProfile, WeekPlan};
pub use planner::{MicroLpSolver, MilpSolver, PlanOutcome, PlanRequest, plan_week};
