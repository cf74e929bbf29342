mod ingredient;
mod plan;
mod profile;
mod recipe;

pub use ingredient::Ingredient;
pub use plan::{DAYS_PER_WEEK, DayMenu, WeekPlan};
pub use profile::{ActivityLevel, NutritionTarget, ProfileKey, Sex, UserProfile};
pub use recipe::{Recipe, RecipeId, Role};
