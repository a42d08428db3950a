use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Raised when a stored string is not one of the known enumeration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// A user's own gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::NonBinary => "non-binary",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "non-binary" => Ok(Gender::NonBinary),
            "other" => Ok(Gender::Other),
            _ => Err(ParseEnumError {
                kind: "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// Which roommate gender a user is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenderPreference {
    Only(Gender),
    NoPreference,
}

impl GenderPreference {
    /// Whether someone of `gender` satisfies this preference.
    ///
    /// An unknown gender only satisfies the no-preference sentinel.
    pub fn accepts(&self, gender: Option<Gender>) -> bool {
        match self {
            GenderPreference::NoPreference => true,
            GenderPreference::Only(wanted) => gender == Some(*wanted),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenderPreference::Only(gender) => gender.as_str(),
            GenderPreference::NoPreference => "no-preference",
        }
    }
}

impl FromStr for GenderPreference {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "no preference" | "no-preference" => Ok(GenderPreference::NoPreference),
            other => other
                .parse::<Gender>()
                .map(GenderPreference::Only)
                .map_err(|_| ParseEnumError {
                    kind: "gender preference",
                    value: s.to_string(),
                }),
        }
    }
}

macro_rules! string_enum_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum_serde!(Gender);
string_enum_serde!(GenderPreference);

/// Decode an optional enumeration, treating unknown strings as absent.
///
/// Rows written by older clients may carry free-text values; those must never
/// become wildcards, so they fall back to `None` and fail their constraint.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Decode an optional request field, treating blank strings as unset.
///
/// Edit forms post `""` for every field the user left empty. Non-blank
/// values must still parse, so an unknown enumeration is rejected.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => {
            value.parse().map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Closed monthly rent interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRange {
    pub min: i64,
    pub max: i64,
}

impl BudgetRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn span(&self) -> i64 {
        self.max - self.min
    }

    #[inline]
    pub fn overlaps(&self, other: &BudgetRange) -> bool {
        self.min <= other.max && self.max >= other.min
    }
}

/// Intern profile as stored in the `profiles` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub internship_company: Option<String>,
    #[serde(default)]
    pub internship_title: Option<String>,
    #[serde(default)]
    pub internship_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internship_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internship_end: Option<NaiveDate>,
    #[serde(default)]
    pub price_range_min: Option<i64>,
    #[serde(default)]
    pub price_range_max: Option<i64>,
    #[serde(default)]
    pub additional_preferences: Option<String>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub preferred_gender: Option<GenderPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Internship location, `None` when absent or empty
    pub fn location(&self) -> Option<&str> {
        non_empty(&self.internship_location)
    }

    /// Employer, `None` when absent or empty
    pub fn company(&self) -> Option<&str> {
        non_empty(&self.internship_company)
    }

    /// Budget interval, available only when both bounds are set
    pub fn budget(&self) -> Option<BudgetRange> {
        match (self.price_range_min, self.price_range_max) {
            (Some(min), Some(max)) => Some(BudgetRange::new(min, max)),
            _ => None,
        }
    }

    /// Names of the fields the eligibility filter needs but this profile lacks
    pub fn missing_match_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.location().is_none() {
            missing.push("internship_location");
        }
        if self.price_range_min.is_none() {
            missing.push("price_range_min");
        }
        if self.price_range_max.is_none() {
            missing.push("price_range_max");
        }
        if self.preferred_gender.is_none() {
            missing.push("preferred_gender");
        }
        missing
    }

    /// Overlay every field set in `update`, leaving the rest untouched
    pub fn apply(&mut self, update: ProfileUpdate) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if update.$field.is_some() { self.$field = update.$field; })*
            };
        }

        overlay!(
            full_name,
            avatar_url,
            institution,
            major,
            internship_company,
            internship_title,
            internship_location,
            internship_start,
            internship_end,
            price_range_min,
            price_range_max,
            additional_preferences,
            gender,
            preferred_gender,
        );
    }
}

/// Field set accepted by create/upsert; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_budget_order"))]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 200))]
    #[serde(default, deserialize_with = "blank_as_none", alias = "fullName")]
    pub full_name: Option<String>,
    #[validate(url)]
    #[serde(default, deserialize_with = "blank_as_none", alias = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub institution: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub major: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default, deserialize_with = "blank_as_none", alias = "internshipCompany")]
    pub internship_company: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default, deserialize_with = "blank_as_none", alias = "internshipTitle")]
    pub internship_title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    #[serde(default, deserialize_with = "blank_as_none", alias = "internshipLocation")]
    pub internship_location: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", alias = "internshipStart")]
    pub internship_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none", alias = "internshipEnd")]
    pub internship_end: Option<NaiveDate>,
    #[validate(range(min = 0))]
    #[serde(default, alias = "priceRangeMin")]
    pub price_range_min: Option<i64>,
    #[validate(range(min = 0))]
    #[serde(default, alias = "priceRangeMax")]
    pub price_range_max: Option<i64>,
    #[validate(length(max = 2000))]
    #[serde(default, deserialize_with = "blank_as_none", alias = "additionalPreferences")]
    pub additional_preferences: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "blank_as_none", alias = "preferredGender")]
    pub preferred_gender: Option<GenderPreference>,
}

fn validate_budget_order(update: &ProfileUpdate) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (update.price_range_min, update.price_range_max) {
        if min > max {
            return Err(ValidationError::new("price_range_min_exceeds_max"));
        }
    }
    Ok(())
}

/// How the budget term's denominator is chosen when ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanNormalization {
    /// Widest span among the requester and the two candidates being compared
    #[default]
    Pairwise,
    /// Widest span among the requester and every eligible candidate
    Global,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub budget: f64,
    pub employer: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget: 10.0,
            employer: 1.0,
        }
    }
}
