//! Local validation for community-submitted opportunities.
//!
//! Drafts are checked and previewed in process only. There is no endpoint
//! to send them to.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{OpportunityKind, OpportunityRecord, Scope, Urgency};
use crate::services::geo::resolve_coordinates;
use crate::utils::text::clean_description;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> Result<&'static Regex> {
    if let Some(re) = EMAIL_RE.get() {
        return Ok(re);
    }
    let re = Regex::new(EMAIL_PATTERN)
        .map_err(|e| AppError::validation(format!("email pattern: {e}")))?;
    Ok(EMAIL_RE.get_or_init(|| re))
}

/// Form input for a new opportunity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDraft {
    pub title: String,
    pub organization: String,
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub urgency: Urgency,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub time_commitment: Option<String>,
    #[serde(default)]
    pub participants_needed: Option<u32>,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

impl SubmissionDraft {
    /// Check required fields and the contact email.
    ///
    /// All problems are reported together, joined with `; `.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        for (field, value) in [
            ("title", &self.title),
            ("organization", &self.organization),
            ("location", &self.location),
            ("description", &self.description),
            ("contact email", &self.contact_email),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{field} is required"));
            }
        }

        let email = self.contact_email.trim();
        if !email.is_empty() && !email_pattern()?.is_match(email) {
            problems.push(format!("'{email}' is not a valid email address"));
        }

        if self.participants_needed == Some(0) {
            problems.push("participants needed must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(problems.join("; ")))
        }
    }

    /// Validate, then render the record as it would be listed.
    pub fn preview(&self, id: impl Into<String>) -> Result<OpportunityRecord> {
        self.validate()?;

        let location = self.location.trim().to_string();
        Ok(OpportunityRecord {
            id: id.into(),
            title: self.title.trim().to_string(),
            organization: self.organization.trim().to_string(),
            organization_logo: None,
            coordinates: Some(resolve_coordinates(&location)),
            is_remote: location.eq_ignore_ascii_case("remote/online"),
            location,
            description: clean_description(&self.description),
            kind: self.kind,
            urgency: self.urgency,
            time_commitment: self
                .time_commitment
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            participants_needed: self.participants_needed,
            contact_url: Some(format!("mailto:{}", self.contact_email.trim())),
            website: None,
            categories: Vec::new(),
            date_range: self
                .deadline
                .map(|d| format!("Until {}", d.format("%B %-d, %Y")))
                .unwrap_or_else(|| "Ongoing".to_string()),
            scope: Scope::Local,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> SubmissionDraft {
        SubmissionDraft {
            title: "Winter Coat Drive".to_string(),
            organization: "Tempe Neighbors".to_string(),
            kind: OpportunityKind::Donation,
            urgency: Urgency::Medium,
            location: "North Tempe".to_string(),
            description: "Collect  gently used\ncoats.".to_string(),
            time_commitment: None,
            participants_needed: Some(5),
            contact_email: "coats@tempeneighbors.org".to_string(),
            contact_phone: None,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1),
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let mut d = draft();
        d.title = "  ".to_string();
        d.location = String::new();
        let err = d.validate().unwrap_err().to_string();
        assert!(err.contains("title is required"));
        assert!(err.contains("location is required"));
    }

    #[test]
    fn test_email_shape() {
        let mut d = draft();
        for bad in ["coats", "coats@", "coats@tempe", "co ats@tempe.org"] {
            d.contact_email = bad.to_string();
            assert!(d.validate().is_err(), "{bad} should be rejected");
        }
        d.contact_email = "a.b+c@example.co".to_string();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_preview_record() {
        let record = draft().preview("draft-1").unwrap();
        assert_eq!(record.id, "draft-1");
        assert_eq!(record.description, "Collect gently used coats.");
        assert_eq!(record.contact_url.as_deref(), Some("mailto:coats@tempeneighbors.org"));
        assert_eq!(record.date_range, "Until December 1, 2026");
        assert_eq!(record.coordinates, Some(resolve_coordinates("North Tempe")));
        assert!(!record.is_remote);
    }

    #[test]
    fn test_deserializes_form_payload() {
        let json = r#"{
            "title": "Shelter night shift",
            "organization": "CASS",
            "type": "volunteer",
            "urgency": "high",
            "location": "Phoenix",
            "description": "Overnight front desk",
            "contactEmail": "shifts@cassaz.org",
            "deadline": "2026-11-30"
        }"#;
        let d: SubmissionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.kind, OpportunityKind::Volunteer);
        assert_eq!(d.deadline, NaiveDate::from_ymd_opt(2026, 11, 30));
        assert!(d.validate().is_ok());
    }
}
