pub mod prompts;
pub mod render;

pub use prompts::{
    collect_profile, confirm_on_hand_names, known_age_brackets, parse_on_hand_pair,
    prompt_activity, prompt_age_bracket, prompt_sex, prompt_yes_no, suggest_name,
};
pub use render::{
    display_classes, display_model_stats, display_nutrient_summary, display_outcome,
    display_shopping_list, display_week_plan,
};
