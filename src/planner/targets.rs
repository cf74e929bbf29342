use tracing::debug;

use crate::error::{MenuError, Result};
use crate::models::{ActivityLevel, NutritionTarget, ProfileKey, UserProfile};
use crate::planner::constants::ELDERLY_BRACKET;

/// The key used to look up a template for `profile`.
///
/// Users in the `75+` bracket with a high activity level are matched against
/// the moderate-activity template. The profile itself is left untouched.
pub fn lookup_key(profile: &UserProfile) -> ProfileKey {
    let mut key = profile.key();
    if key.age_bracket.trim() == ELDERLY_BRACKET && key.activity == ActivityLevel::High {
        key.activity = ActivityLevel::Moderate;
    }
    key
}

/// Select the nutrition target template matching `profile` exactly.
///
/// There is no fallback template: an unmatched profile is a hard error.
pub fn select_target<'a>(
    profile: &UserProfile,
    targets: &'a [NutritionTarget],
) -> Result<&'a NutritionTarget> {
    let key = lookup_key(profile);
    if key.activity != profile.activity {
        debug!(
            age = %key.age_bracket,
            "activity level {} looked up as {}",
            profile.activity.as_str(),
            key.activity.as_str()
        );
    }

    targets
        .iter()
        .find(|t| {
            t.profile.age_bracket.trim() == key.age_bracket.trim()
                && t.profile.sex == key.sex
                && t.profile.activity == key.activity
        })
        .ok_or(MenuError::TargetNotFound(key))
}
