use serde::{Deserialize, Serialize};

use crate::models::recipe::{RecipeId, Role};

/// Number of days in a plan.
pub const DAYS_PER_WEEK: usize = 7;

/// One day's menu: a recipe id or empty for each role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMenu {
    pub staple: Option<RecipeId>,
    pub main: Option<RecipeId>,
    pub side: Option<RecipeId>,
    pub soup: Option<RecipeId>,
}

impl DayMenu {
    pub fn get(&self, role: Role) -> Option<RecipeId> {
        match role {
            Role::Staple => self.staple,
            Role::Main => self.main,
            Role::Side => self.side,
            Role::Soup => self.soup,
        }
    }

    pub(crate) fn set(&mut self, role: Role, recipe: Option<RecipeId>) {
        match role {
            Role::Staple => self.staple = recipe,
            Role::Main => self.main = recipe,
            Role::Side => self.side = recipe,
            Role::Soup => self.soup = recipe,
        }
    }

    /// Filled roles with their recipes, in menu order.
    pub fn dishes(&self) -> impl Iterator<Item = (Role, RecipeId)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|id| (role, id)))
    }

    pub fn dish_count(&self) -> usize {
        self.dishes().count()
    }
}

/// A week of menus.
///
/// Built once per optimization run and never edited afterwards; regenerating
/// a plan produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekPlan {
    days: [DayMenu; DAYS_PER_WEEK],
}

impl WeekPlan {
    pub fn new(days: [DayMenu; DAYS_PER_WEEK]) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[DayMenu; DAYS_PER_WEEK] {
        &self.days
    }

    pub fn day(&self, index: usize) -> Option<&DayMenu> {
        self.days.get(index)
    }

    /// All selected recipe ids across the week, with repeats.
    pub fn recipe_ids(&self) -> impl Iterator<Item = RecipeId> + '_ {
        self.days.iter().flat_map(|d| d.dishes().map(|(_, id)| id))
    }

    /// How many times `recipe` appears across the week.
    pub fn occurrences(&self, recipe: RecipeId) -> usize {
        self.recipe_ids().filter(|&id| id == recipe).count()
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.dish_count() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_menu_dishes_in_order() {
        let mut day = DayMenu::default();
        day.set(Role::Soup, Some(4));
        day.set(Role::Staple, Some(1));
        let dishes: Vec<(Role, RecipeId)> = day.dishes().collect();
        assert_eq!(dishes, vec![(Role::Staple, 1), (Role::Soup, 4)]);
        assert_eq!(day.dish_count(), 2);
    }

    #[test]
    fn test_occurrences() {
        let day = DayMenu {
            staple: Some(1),
            main: Some(2),
            side: None,
            soup: Some(3),
        };
        let plan = WeekPlan::new([day; DAYS_PER_WEEK]);
        assert_eq!(plan.occurrences(1), 7);
        assert_eq!(plan.occurrences(9), 0);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_serialize_shape() {
        let plan = WeekPlan::new([DayMenu::default(); DAYS_PER_WEEK]);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["days"].as_array().unwrap().len(), DAYS_PER_WEEK);
        assert!(json["days"][0]["main"].is_null());
        assert!(plan.is_empty());
    }
}
