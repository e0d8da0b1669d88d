//! Maps directory listings into canonical `OpportunityRecord`s.

use std::collections::HashSet;

use crate::models::{
    Coordinates, OpportunityKind, OpportunityRecord, RemoteOpportunity, Scope, Urgency,
};
use crate::utils::absolutize_protocol_relative;
use crate::utils::text::clean_description;

/// Keywords that mark a listing as high urgency.
const HIGH_URGENCY_KEYWORDS: [&str; 3] = ["urgent", "crisis", "emergency"];

/// Date marker for open-ended listings.
const ONGOING_MARKER: &str = "ongoing";

const REMOTE_LOCATION: &str = "Remote/Online";
const NATIONAL_LOCATION: &str = "National";
const LOCALITY_PLACEHOLDER: &str = "Local Area";
const DEFAULT_CATEGORY: &str = "Community Service";
const DEFAULT_DATE_RANGE: &str = "Ongoing";

/// Stateless normalizer for directory listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Normalize a whole page, dropping any repeated id after its first
    /// occurrence.
    pub fn normalize_page(&self, items: &[RemoteOpportunity]) -> Vec<OpportunityRecord> {
        let mut seen = HashSet::new();
        items
            .iter()
            .filter(|item| {
                let fresh = seen.insert(item.id);
                if !fresh {
                    log::debug!("Dropping duplicate remote listing {}", item.id);
                }
                fresh
            })
            .map(|item| self.normalize(item))
            .collect()
    }

    /// Normalize one listing.
    pub fn normalize(&self, item: &RemoteOpportunity) -> OpportunityRecord {
        let categories: Vec<String> = item
            .activities
            .iter()
            .map(|activity| activity.category.trim())
            .filter(|category| !category.is_empty())
            .map(str::to_string)
            .collect();

        OpportunityRecord {
            id: item.id.to_string(),
            title: item.title.trim().to_string(),
            organization: item.organization.name.trim().to_string(),
            organization_logo: item
                .organization
                .logo
                .as_deref()
                .filter(|logo| !logo.is_empty())
                .map(absolutize_protocol_relative),
            location: format_location(item),
            description: clean_description(&item.description),
            kind: OpportunityKind::Volunteer,
            urgency: classify_urgency(&item.title, &item.description, item.dates.as_deref()),
            time_commitment: non_blank(item.duration.as_deref()),
            participants_needed: None,
            coordinates: Coordinates::from_parts(item.audience.latitude, item.audience.longitude),
            contact_url: non_blank(item.url.as_deref()),
            website: non_blank(item.organization.url.as_deref()),
            is_remote: item.remote_or_online,
            categories: if categories.is_empty() {
                vec![DEFAULT_CATEGORY.to_string()]
            } else {
                categories
            },
            date_range: non_blank(item.dates.as_deref())
                .unwrap_or_else(|| DEFAULT_DATE_RANGE.to_string()),
            scope: parse_scope(item.audience.scope.as_deref()),
        }
    }
}

/// Classify urgency from title, description and the raw date field.
///
/// Keyword matches win over the ongoing marker.
pub fn classify_urgency(title: &str, description: &str, dates: Option<&str>) -> Urgency {
    let text = format!("{} {}", title, description).to_lowercase();
    if HIGH_URGENCY_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return Urgency::High;
    }
    if dates.is_some_and(|d| d.to_lowercase().contains(ONGOING_MARKER)) {
        return Urgency::Low;
    }
    Urgency::Medium
}

/// Human-readable location line for a listing.
pub fn format_location(item: &RemoteOpportunity) -> String {
    if item.remote_or_online {
        return REMOTE_LOCATION.to_string();
    }

    let regions: Vec<&str> = item
        .audience
        .regions
        .iter()
        .flatten()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();
    if !regions.is_empty() {
        return regions.join(", ");
    }

    if parse_scope(item.audience.scope.as_deref()) == Scope::National {
        NATIONAL_LOCATION.to_string()
    } else {
        LOCALITY_PLACEHOLDER.to_string()
    }
}

fn parse_scope(scope: Option<&str>) -> Scope {
    scope.and_then(|s| s.parse().ok()).unwrap_or_default()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
