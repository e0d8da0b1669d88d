//! Search filters supplied by the presentation layer.

use serde::{Deserialize, Serialize};

use crate::models::{OpportunityKind, OpportunityRecord, Urgency};

/// Filters for one search. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Free-form place name, matched against the formatted location
    #[serde(default)]
    pub location: Option<String>,

    /// Remote directory country code (`cc`)
    #[serde(default)]
    pub country_code: Option<String>,

    /// Remote directory area codes (`ac`, repeatable)
    #[serde(default)]
    pub area_codes: Vec<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<OpportunityKind>,

    #[serde(default)]
    pub urgency: Option<Urgency>,

    #[serde(default)]
    pub keyword: Option<String>,

    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            location: None,
            country_code: None,
            area_codes: Vec::new(),
            kind: None,
            urgency: None,
            keyword: None,
            page: default_page(),
        }
    }
}

impl SearchFilters {
    pub fn with_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    pub fn with_location(country_code: impl Into<String>, area_code: Option<String>) -> Self {
        Self {
            country_code: Some(country_code.into()),
            area_codes: area_code.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Return a sanitized copy: blank strings become absent and a
    /// non-positive page is clamped to 1.
    pub fn normalized(&self) -> Self {
        let page = if self.page < 1 {
            log::warn!("Invalid page {} in search filters, using 1", self.page);
            1
        } else {
            self.page
        };

        Self {
            location: non_blank(&self.location),
            country_code: non_blank(&self.country_code),
            area_codes: self
                .area_codes
                .iter()
                .map(|code| code.trim())
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect(),
            kind: self.kind,
            urgency: self.urgency,
            keyword: non_blank(&self.keyword),
            page,
        }
    }

    /// Page number as used for pagination arithmetic.
    pub fn page_number(&self) -> u32 {
        u32::try_from(self.page.max(1)).unwrap_or(u32::MAX)
    }

    /// True when none of the remote query filters are set.
    pub fn has_remote_query(&self) -> bool {
        self.country_code.is_some() || !self.area_codes.is_empty() || self.keyword.is_some()
    }

    /// Same filters, pointed at another page.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page: i64::from(page),
            ..self.clone()
        }
    }

    /// Filters that neither remote path can push to the server: type,
    /// urgency and location substring.
    pub fn accepts(&self, record: &OpportunityRecord) -> bool {
        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }
        if let Some(urgency) = self.urgency {
            if record.urgency != urgency {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !record
                .location
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
