use tracing::{debug, warn};

use crate::models::{DAYS_PER_WEEK, DayMenu, RecipeId, Role, WeekPlan};
use crate::planner::builder::Selection;
use crate::planner::constants::SELECTION_THRESHOLD;

/// Read a solved assignment into a week plan.
///
/// For each (day, role) the recipe whose value is at least 0.5 is chosen; if
/// several qualify the smallest recipe id wins. A role with no qualifying
/// recipe stays empty.
pub fn extract_plan(selections: &[Selection], values: &[f64]) -> WeekPlan {
    let mut days = [DayMenu::default(); DAYS_PER_WEEK];

    for (day, menu) in days.iter_mut().enumerate() {
        for role in Role::ALL {
            let qualifying: Vec<RecipeId> = selections
                .iter()
                .filter(|s| s.day == day && s.role == role)
                .filter(|s| values.get(s.var.index()).copied().unwrap_or(0.0) >= SELECTION_THRESHOLD)
                .map(|s| s.recipe)
                .collect();

            if qualifying.len() > 1 {
                warn!(
                    day = day + 1,
                    role = %role,
                    candidates = ?qualifying,
                    "several recipes selected for one slot, keeping the smallest id"
                );
            }
            menu.set(role, qualifying.into_iter().min());
        }
        debug!(day = day + 1, dishes = menu.dish_count(), "extracted day");
    }

    WeekPlan::new(days)
}
