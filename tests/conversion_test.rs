use assert_float_eq::assert_float_absolute_eq;

use menu_planner_rs::config::Formulation;
use menu_planner_rs::error::MenuError;
use menu_planner_rs::models::{ActivityLevel, Ingredient, NutritionTarget, ProfileKey, Sex, UserProfile};
use menu_planner_rs::planner::{IngredientResolver, convert_bounds, lookup_key, select_target};

fn target(age: &str, sex: Sex, activity: ActivityLevel, bounds: &[(&str, f64)]) -> NutritionTarget {
    NutritionTarget {
        profile: ProfileKey {
            age_bracket: age.to_string(),
            sex,
            activity,
        },
        bounds: bounds.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

fn profile(age: &str, sex: Sex, activity: ActivityLevel, menstruating: bool) -> UserProfile {
    UserProfile {
        age_bracket: age.to_string(),
        sex,
        activity,
        menstruating,
    }
}

fn sample_targets() -> Vec<NutritionTarget> {
    vec![
        target(
            "30-49",
            Sex::Female,
            ActivityLevel::Moderate,
            &[
                ("calorie", 2000.0),
                ("protein_lower", 13.0),
                ("protein_upper", 20.0),
                ("fat_lower", 20.0),
                ("fat_upper", 30.0),
                ("carbohydrate_lower", 50.0),
                ("carbohydrate_upper", 65.0),
                ("iron_lower", 6.5),
                ("iron_menstruation_lower", 10.5),
                ("iron_upper", 40.0),
                ("salt_upper", 6.5),
            ],
        ),
        target("75+", Sex::Male, ActivityLevel::Moderate, &[("calorie", 2100.0)]),
        target("75+", Sex::Male, ActivityLevel::Low, &[("calorie", 1800.0)]),
    ]
}

#[test]
fn test_macro_percentages_become_grams() {
    let targets = sample_targets();
    let user = profile("30-49", Sex::Female, ActivityLevel::Moderate, false);
    let chosen = select_target(&user, &targets).unwrap();
    let bounds = convert_bounds(chosen, user.menstruating, Formulation::Full).unwrap();

    let protein = bounds.get("protein").unwrap();
    assert_float_absolute_eq!(protein.upper.unwrap(), 100.0, 1e-9);
    assert_float_absolute_eq!(protein.lower.unwrap(), 65.0, 1e-9);

    let fat = bounds.get("fat").unwrap();
    assert_float_absolute_eq!(fat.upper.unwrap(), 2000.0 * 0.30 / 9.0, 1e-9);

    let carbohydrate = bounds.get("carbohydrate").unwrap();
    assert_float_absolute_eq!(carbohydrate.lower.unwrap(), 250.0, 1e-9);

    let calorie = bounds.get("calorie").unwrap();
    assert_float_absolute_eq!(calorie.lower.unwrap(), 1800.0, 1e-9);
    assert_float_absolute_eq!(calorie.upper.unwrap(), 2200.0, 1e-9);

    // Absolute bounds pass through unchanged; a missing side stays open
    let salt = bounds.get("salt").unwrap();
    assert_eq!(salt.lower, None);
    assert_float_absolute_eq!(salt.upper.unwrap(), 6.5, 1e-12);
    assert_float_absolute_eq!(bounds.get("iron").unwrap().lower.unwrap(), 6.5, 1e-12);
}

#[test]
fn test_menstruation_iron_bound() {
    let targets = sample_targets();
    let user = profile("30-49", Sex::Female, ActivityLevel::Moderate, true);
    let bounds = convert_bounds(select_target(&user, &targets).unwrap(), true, Formulation::Full).unwrap();
    let iron = bounds.get("iron").unwrap();
    assert_float_absolute_eq!(iron.lower.unwrap(), 10.5, 1e-12);
    assert_float_absolute_eq!(iron.upper.unwrap(), 40.0, 1e-12);
}

#[test]
fn test_micronutrients_only_formulation() {
    let targets = sample_targets();
    let bounds = convert_bounds(&targets[0], false, Formulation::MicronutrientsOnly).unwrap();
    assert!(bounds.get("calorie").is_none());
    assert!(bounds.get("protein").is_none());
    assert!(bounds.get("salt").is_some());
}

#[test]
fn test_missing_calorie_target() {
    let t = target("18-29", Sex::Male, ActivityLevel::Low, &[("protein_upper", 20.0)]);
    let err = convert_bounds(&t, false, Formulation::Full).unwrap_err();
    assert!(matches!(err, MenuError::MissingCalorieTarget));
}

#[test]
fn test_elderly_high_activity_uses_moderate_template() {
    let targets = sample_targets();
    let user = profile("75+", Sex::Male, ActivityLevel::High, false);

    assert_eq!(lookup_key(&user).activity, ActivityLevel::Moderate);
    let chosen = select_target(&user, &targets).unwrap();
    assert_eq!(chosen.bounds["calorie"], 2100.0);
    // The stored profile is not rewritten
    assert_eq!(user.activity, ActivityLevel::High);
}

#[test]
fn test_unmatched_profile_is_an_error() {
    let targets = sample_targets();
    let user = profile("18-29", Sex::Female, ActivityLevel::High, false);
    match select_target(&user, &targets) {
        Err(MenuError::TargetNotFound(key)) => {
            assert_eq!(key.age_bracket, "18-29");
            assert_eq!(key.activity, ActivityLevel::High);
        }
        other => panic!("expected TargetNotFound, got {:?}", other.map(|t| &t.profile)),
    }
}

#[test]
fn test_equivalences_are_transitive_across_entries() {
    let ingredients = vec![
        Ingredient {
            name: "scallion".to_string(),
            equivalents: vec!["green onion".to_string()],
            packaging: vec![],
        },
        Ingredient {
            name: "spring onion".to_string(),
            equivalents: vec!["green onion".to_string()],
            packaging: vec![],
        },
    ];
    let resolver = IngredientResolver::from_ingredients(&ingredients);

    let canonical = resolver.canonicalize("spring onion");
    assert_eq!(resolver.canonicalize("scallion"), canonical);
    assert_eq!(resolver.canonicalize("green onion"), canonical);
    assert_eq!(resolver.canonicalize(canonical), canonical);
    assert_eq!(resolver.canonicalize("ginger"), "ginger");

    let classes = resolver.classes();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes.values().next().map(Vec::len), Some(3));
}
