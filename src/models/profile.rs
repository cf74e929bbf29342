use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 3] = [
        ActivityLevel::Low,
        ActivityLevel::Moderate,
        ActivityLevel::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sex::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sex '{}', expected male or female", s))
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown activity level '{}', expected low, moderate or high", s))
    }
}

/// The attributes a nutrition target template is matched on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileKey {
    pub age_bracket: String,
    pub sex: Sex,
    pub activity: ActivityLevel,
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "age {}, {}, activity {}",
            self.age_bracket,
            self.sex.as_str(),
            self.activity.as_str()
        )
    }
}

/// A user's archetype, as stored. Never rewritten by target matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age_bracket: String,
    pub sex: Sex,
    pub activity: ActivityLevel,
    #[serde(default)]
    pub menstruating: bool,
}

impl UserProfile {
    pub fn key(&self) -> ProfileKey {
        ProfileKey {
            age_bracket: self.age_bracket.clone(),
            sex: self.sex,
            activity: self.activity,
        }
    }
}

/// A nutrition target template.
///
/// `bounds` mixes the exact calorie target (`calorie`), percentage-of-calorie
/// macro bounds (`protein_upper`, `fat_lower`, ...) and absolute bounds for
/// every other nutrient (`calcium_lower`, `iron_menstruation_lower`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionTarget {
    pub profile: ProfileKey,
    #[serde(default)]
    pub bounds: BTreeMap<String, f64>,
}
