use thiserror::Error;

use crate::models::{ProfileKey, RecipeId, Role};

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("No candidate recipes for role: {0}")]
    RoleEmpty(Role),

    #[error("No nutrition target matches profile: {0}")]
    TargetNotFound(ProfileKey),

    #[error("Model is infeasible: {0}")]
    Infeasible(String),

    #[error("Model is unbounded")]
    Unbounded,

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Nutrition target has no calorie value")]
    MissingCalorieTarget,

    #[error("Extracted plan violates a constraint: {0}")]
    PlanDefect(String),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl MenuError {
    /// Data-shape errors are raised before the solver runs and are never worth retrying.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MenuError::RoleEmpty(_)
                | MenuError::TargetNotFound(_)
                | MenuError::MissingCalorieTarget
                | MenuError::InvalidConfig(_)
                | MenuError::InvalidInput(_)
        )
    }

    /// Solver outcomes the caller may resolve by relaxing soft constraints and resubmitting.
    pub fn is_solver_outcome(&self) -> bool {
        matches!(
            self,
            MenuError::Infeasible(_) | MenuError::Unbounded | MenuError::Solver(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;
