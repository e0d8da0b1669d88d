//! Canonical opportunity record and its enumerated fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Whether a listing asks for time or for goods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityKind {
    Volunteer,
    Donation,
}

/// Urgency classification. Always exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

/// Geographic reach of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Local,
    Regional,
    National,
}

impl OpportunityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volunteer => "volunteer",
            Self::Donation => "donation",
        }
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Regional => "regional",
            Self::National => "national",
        }
    }
}

impl FromStr for OpportunityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "volunteer" => Ok(Self::Volunteer),
            "donation" => Ok(Self::Donation),
            other => Err(AppError::validation(format!(
                "unknown opportunity type '{other}'"
            ))),
        }
    }
}

impl FromStr for Urgency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(AppError::validation(format!("unknown urgency '{other}'"))),
        }
    }
}

impl FromStr for Scope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "regional" => Ok(Self::Regional),
            "national" => Ok(Self::National),
            other => Err(AppError::validation(format!("unknown scope '{other}'"))),
        }
    }
}

impl fmt::Display for OpportunityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair. Both halves are always present together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Pair up two optional halves; a lone half yields nothing.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// A single volunteer or donation listing in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRecord {
    /// Unique within a page
    pub id: String,

    pub title: String,

    /// Organization display name
    pub organization: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_logo: Option<String>,

    /// Human-readable location line
    pub location: String,

    /// Cleaned description, at most 300 characters plus an ellipsis
    pub description: String,

    #[serde(rename = "type")]
    pub kind: OpportunityKind,

    pub urgency: Urgency,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_commitment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants_needed: Option<u32>,

    /// Serialized as flat `latitude` / `longitude` fields
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    pub is_remote: bool,

    pub categories: Vec<String>,

    pub date_range: String,

    pub scope: Scope,
}

impl OpportunityRecord {
    /// Whether the record can be drawn as a map pin.
    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Case-insensitive keyword match across title, description, organization
    /// and categories. `needle` must already be lowercase.
    pub fn matches_keyword(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.organization.to_lowercase().contains(needle)
            || self
                .categories
                .iter()
                .any(|category| category.to_lowercase().contains(needle))
    }
}
