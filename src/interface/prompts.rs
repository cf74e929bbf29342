use std::collections::BTreeMap;

use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{MenuError, Result};
use crate::models::{ActivityLevel, NutritionTarget, Sex, UserProfile};

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Closest known name to `input`, if any is similar enough.
pub fn suggest_name<'a>(input: &str, known: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let needle = input.trim().to_lowercase();
    known
        .into_iter()
        .map(|name| (name, jaro_winkler(&name.to_lowercase(), &needle)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(name, _)| name)
}

/// Age brackets declared by the target templates, deduplicated in order.
pub fn known_age_brackets(targets: &[NutritionTarget]) -> Vec<&str> {
    let mut brackets: Vec<&str> = Vec::new();
    for target in targets {
        let bracket = target.profile.age_bracket.as_str();
        if !brackets.contains(&bracket) {
            brackets.push(bracket);
        }
    }
    brackets
}

/// Prompt for an age bracket, offering a correction for near misses.
pub fn prompt_age_bracket(known: &[&str]) -> Result<String> {
    if !known.is_empty() && known.len() <= 12 {
        let selection = Select::new()
            .with_prompt("Age bracket")
            .items(known)
            .default(0)
            .interact()?;
        return Ok(known[selection].to_string());
    }

    let input: String = Input::new().with_prompt("Age bracket").interact_text()?;
    let input = input.trim();
    if known.is_empty() || known.contains(&input) {
        return Ok(input.to_string());
    }

    if let Some(candidate) = suggest_name(input, known.iter().copied()) {
        let confirm = Confirm::new()
            .with_prompt(format!("Did you mean '{}'?", candidate))
            .default(true)
            .interact()?;
        if confirm {
            return Ok(candidate.to_string());
        }
    }
    Ok(input.to_string())
}

pub fn prompt_sex() -> Result<Sex> {
    let options: Vec<&str> = Sex::ALL.iter().map(|s| s.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Sex")
        .items(&options)
        .default(0)
        .interact()?;
    Ok(Sex::ALL[selection])
}

pub fn prompt_activity() -> Result<ActivityLevel> {
    let options: Vec<&str> = ActivityLevel::ALL.iter().map(|a| a.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Activity level")
        .items(&options)
        .default(1) // moderate
        .interact()?;
    Ok(ActivityLevel::ALL[selection])
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect a full profile interactively.
pub fn collect_profile(targets: &[NutritionTarget]) -> Result<UserProfile> {
    let age_bracket = prompt_age_bracket(&known_age_brackets(targets))?;
    let sex = prompt_sex()?;
    let activity = prompt_activity()?;
    let menstruating = sex == Sex::Female && prompt_yes_no("Currently menstruating?", false)?;

    Ok(UserProfile {
        age_bracket,
        sex,
        activity,
        menstruating,
    })
}

/// Offer corrections for on-hand names no recipe or ingredient entry knows.
///
/// Accepted suggestions are renamed, quantities merging into the known name;
/// everything else is kept as typed.
pub fn confirm_on_hand_names(
    on_hand: BTreeMap<String, f64>,
    known: &[&str],
) -> Result<BTreeMap<String, f64>> {
    let mut out = BTreeMap::new();
    for (name, qty) in on_hand {
        let mut key = name;
        if !known.contains(&key.as_str()) {
            match suggest_name(&key, known.iter().copied()) {
                Some(candidate) => {
                    let accept = prompt_yes_no(
                        &format!("On-hand '{}' is unknown. Did you mean '{}'?", key, candidate),
                        true,
                    )?;
                    if accept {
                        key = candidate.to_string();
                    }
                }
                None => println!("On-hand ingredient '{}' is not used by any recipe.", key),
            }
        }
        *out.entry(key).or_insert(0.0) += qty;
    }
    Ok(out)
}

/// Parse a `name=grams` pair given on the command line.
pub fn parse_on_hand_pair(pair: &str) -> Result<(String, f64)> {
    let (name, qty) = pair
        .split_once('=')
        .ok_or_else(|| MenuError::InvalidInput(format!("expected name=grams, got '{}'", pair)))?;
    let grams: f64 = qty
        .trim()
        .parse()
        .map_err(|_| MenuError::InvalidInput(format!("invalid quantity in '{}'", pair)))?;
    if !grams.is_finite() || grams < 0.0 {
        return Err(MenuError::InvalidInput(format!(
            "quantity must be non-negative in '{}'",
            pair
        )));
    }
    Ok((name.trim().to_string(), grams))
}
