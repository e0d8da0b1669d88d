//! Static fallback catalog.
//!
//! A fixed, hardcoded set of Tempe/Phoenix area opportunities served when the
//! remote directory cannot be used. Content and order never change between
//! runs, and it answers the same filter and pagination contract as the
//! remote path.

use crate::models::{
    ContinuationToken, Coordinates, OpportunityKind, OpportunityRecord, PageResult, Scope,
    SearchFilters, SourceKind, Urgency, total_pages,
};

/// Default number of records per fallback page.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Country code the catalog content belongs to.
const CATALOG_COUNTRY_CODE: &str = "1";

/// Location hints that select the whole catalog. Matched case-sensitively
/// as substrings, so "USA" counts.
const CATALOG_REGION_HINTS: [&str; 2] = ["US", "Arizona"];

/// Read-only in-memory catalog.
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    records: Vec<OpportunityRecord>,
    page_size: usize,
}

impl FallbackCatalog {
    /// Catalog with the built-in dataset.
    pub fn new(page_size: usize) -> Self {
        Self::with_records(builtin_records(), page_size)
    }

    /// Catalog over an arbitrary dataset.
    pub fn with_records(records: Vec<OpportunityRecord>, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn records(&self) -> &[OpportunityRecord] {
        &self.records
    }

    /// Every record passing `filters`, in catalog order.
    ///
    /// A location naming the catalog's region selects everything regardless
    /// of country code; otherwise a foreign country code selects nothing.
    pub fn matching(&self, filters: &SearchFilters) -> Vec<&OpportunityRecord> {
        let region_hint = filters
            .location
            .as_deref()
            .is_some_and(names_catalog_region);

        if !region_hint {
            if let Some(cc) = &filters.country_code {
                if cc != CATALOG_COUNTRY_CODE {
                    return Vec::new();
                }
            }
        }

        let keyword = filters.keyword.as_ref().map(|k| k.to_lowercase());
        let location = filters
            .location
            .as_ref()
            .filter(|_| !region_hint)
            .map(|loc| loc.to_lowercase());

        self.records
            .iter()
            .filter(|record| keyword.as_ref().is_none_or(|kw| record.matches_keyword(kw)))
            .filter(|record| filters.kind.is_none_or(|kind| record.kind == kind))
            .filter(|record| filters.urgency.is_none_or(|urgency| record.urgency == urgency))
            .filter(|record| {
                location
                    .as_ref()
                    .is_none_or(|loc| record.location.to_lowercase().contains(loc))
            })
            .collect()
    }

    /// One page of matching records. `page` is 1-based; 0 is read as 1.
    pub fn get_page(&self, filters: &SearchFilters, page: u32) -> PageResult {
        let page = page.max(1);
        let matching = self.matching(filters);
        let total = matching.len();
        let offset = (page as usize - 1).saturating_mul(self.page_size);
        let has_more = offset.saturating_add(self.page_size) < total;

        let opportunities: Vec<OpportunityRecord> = matching
            .into_iter()
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();

        PageResult {
            opportunities,
            total_count: total as u64,
            has_more,
            next_cursor: has_more.then(|| ContinuationToken::fallback(page.saturating_add(1))),
            previous_cursor: (page > 1).then(|| ContinuationToken::fallback(page - 1)),
            current_page: page,
            total_pages: total_pages(total as u64, self.page_size),
            source_kind: SourceKind::Fallback,
        }
    }

    pub fn find(&self, id: &str) -> Option<&OpportunityRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

fn names_catalog_region(location: &str) -> bool {
    CATALOG_REGION_HINTS
        .iter()
        .any(|hint| location.contains(hint))
}

struct Entry {
    id: &'static str,
    title: &'static str,
    organization: &'static str,
    location: &'static str,
    description: &'static str,
    kind: OpportunityKind,
    urgency: Urgency,
    time_commitment: Option<&'static str>,
    participants_needed: Option<u32>,
    coordinates: (f64, f64),
    contact_url: &'static str,
    website: &'static str,
    categories: &'static [&'static str],
    date_range: &'static str,
    scope: Scope,
}

impl From<Entry> for OpportunityRecord {
    fn from(entry: Entry) -> Self {
        OpportunityRecord {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            organization: entry.organization.to_string(),
            organization_logo: None,
            location: entry.location.to_string(),
            description: entry.description.to_string(),
            kind: entry.kind,
            urgency: entry.urgency,
            time_commitment: entry.time_commitment.map(str::to_string),
            participants_needed: entry.participants_needed,
            coordinates: Some(Coordinates::new(entry.coordinates.0, entry.coordinates.1)),
            contact_url: Some(entry.contact_url.to_string()),
            website: Some(entry.website.to_string()),
            is_remote: false,
            categories: entry.categories.iter().map(|c| c.to_string()).collect(),
            date_range: entry.date_range.to_string(),
            scope: entry.scope,
        }
    }
}

/// The built-in dataset, in display order.
pub fn builtin_records() -> Vec<OpportunityRecord> {
    vec![
        Entry {
            id: "tempe-heat-relief",
            title: "Emergency Heat Relief Distribution",
            organization: "Tempe Community Action",
            location: "Downtown Tempe, AZ",
            description: "Help distribute cooling supplies, water, and provide air-conditioned shelter during extreme heat events. Critical summer volunteer opportunity to protect vulnerable community members.",
            kind: OpportunityKind::Volunteer,
            urgency: Urgency::High,
            time_commitment: Some("4-6 hours"),
            participants_needed: Some(25),
            coordinates: (33.4255, -111.9400),
            contact_url: "mailto:volunteer@tempeaction.org",
            website: "https://tempeaction.org",
            categories: &["Emergency Response", "Community Health", "Crisis Support"],
            date_range: "June - September",
            scope: Scope::Local,
        },
        Entry {
            id: "asu-food-security",
            title: "ASU Student Food Pantry Support",
            organization: "Arizona State University",
            location: "ASU Tempe Campus",
            description: "Support food security for ASU students by helping sort, stock, and distribute food at the campus pantry. Make a direct impact on student success and wellbeing.",
            kind: OpportunityKind::Volunteer,
            urgency: Urgency::Medium,
            time_commitment: Some("3-4 hours/week"),
            participants_needed: Some(15),
            coordinates: (33.4242, -111.9281),
            contact_url: "mailto:foodpantry@asu.edu",
            website: "https://eoss.asu.edu/basicneeds",
            categories: &["Food Security", "Education Support", "Student Services"],
            date_range: "Academic Year",
            scope: Scope::Local,
        },
        Entry {
            id: "tempe-lake-cleanup",
            title: "Tempe Town Lake Environmental Cleanup",
            organization: "Keep Tempe Beautiful",
            location: "Tempe Town Lake",
            description: "Join monthly cleanup events at Tempe Town Lake. Help remove litter, invasive plants, and maintain trails. Keep our community spaces clean and beautiful for everyone.",
            kind: OpportunityKind::Volunteer,
            urgency: Urgency::Low,
            time_commitment: Some("2-3 hours"),
            participants_needed: Some(35),
            coordinates: (33.4297, -111.9398),
            contact_url: "mailto:cleanup@keeptempebeautiful.org",
            website: "https://keeptempebeautiful.org",
            categories: &["Environment", "Community Beautification", "Outdoor Service"],
            date_range: "First Saturday monthly",
            scope: Scope::Local,
        },
        Entry {
            id: "senior-tech-support",
            title: "Senior Technology Support Program",
            organization: "Tempe Senior Services",
            location: "Tempe Senior Center",
            description: "Help seniors learn smartphones, tablets, and computers to stay connected with family and access important services. Bridge the digital divide in our community.",
            kind: OpportunityKind::Volunteer,
            urgency: Urgency::Medium,
            time_commitment: Some("2 hours/week"),
            participants_needed: Some(12),
            coordinates: (33.4550, -111.9400),
            contact_url: "mailto:techhelp@tempe.gov",
            website: "https://www.tempe.gov/seniors",
            categories: &["Technology Education", "Senior Support", "Digital Literacy"],
            date_range: "Ongoing program",
            scope: Scope::Local,
        },
        Entry {
            id: "homeless-outreach",
            title: "Street Outreach and Resource Connection",
            organization: "Central Arizona Shelter Services",
            location: "Phoenix Metro Area",
            description: "Join outreach teams providing resources, meals, and connection to services for individuals experiencing homelessness. Help connect people to housing and support services.",
            kind: OpportunityKind::Volunteer,
            urgency: Urgency::High,
            time_commitment: Some("4-5 hours"),
            participants_needed: Some(20),
            coordinates: (33.4484, -112.0740),
            contact_url: "mailto:outreach@cassaz.org",
            website: "https://www.cassaz.org",
            categories: &["Homelessness", "Social Services", "Community Outreach"],
            date_range: "Weekly opportunities",
            scope: Scope::Regional,
        },
        Entry {
            id: "disaster-prep-training",
            title: "Community Emergency Preparedness Training",
            organization: "Arizona Red Cross",
            location: "Multiple Valley Locations",
            description: "Help teach community members emergency preparedness skills including first aid, disaster response, and family emergency planning. Build community resilience.",
            kind: OpportunityKind::Volunteer,
            urgency: Urgency::Medium,
            time_commitment: Some("6 hours (training + event)"),
            participants_needed: Some(8),
            coordinates: (33.4734, -112.0268),
            contact_url: "mailto:volunteer@redcross.org",
            website: "https://www.redcross.org/local/arizona",
            categories: &["Emergency Preparedness", "Education", "Community Resilience"],
            date_range: "Monthly workshops",
            scope: Scope::Regional,
        },
        Entry {
            id: "youth-mentoring",
            title: "Crisis Support Youth Mentoring",
            organization: "Boys & Girls Clubs of Metro Phoenix",
            location: "East Valley Clubs",
            description: "Mentor at-risk youth in academic and life skills. Provide positive role modeling and support for young people facing challenging circumstances.",
            kind: OpportunityKind::Volunteer,
            urgency: Urgency::Medium,
            time_commitment: Some("2-3 hours/week"),
            participants_needed: Some(10),
            coordinates: (33.4152, -111.8315),
            contact_url: "mailto:mentor@bgcmp.org",
            website: "https://www.bgcmp.org",
            categories: &["Youth Development", "Mentoring", "Education Support"],
            date_range: "6-month commitment",
            scope: Scope::Local,
        },
        Entry {
            id: "food-bank-sorting",
            title: "Food Bank Warehouse Operations",
            organization: "St. Mary's Food Bank",
            location: "Phoenix Warehouse",
            description: "Help sort, pack, and organize food donations at Arizona's largest food bank. Essential work to support food distribution across the state.",
            kind: OpportunityKind::Volunteer,
            urgency: Urgency::High,
            time_commitment: Some("3-4 hours"),
            participants_needed: Some(40),
            coordinates: (33.4625, -112.1129),
            contact_url: "mailto:volunteer@stmarysfoodbank.org",
            website: "https://www.stmarysfoodbank.org",
            categories: &["Food Security", "Warehouse Operations", "Community Support"],
            date_range: "Daily opportunities",
            scope: Scope::Regional,
        },
        Entry {
            id: "school-supply-drive",
            title: "School Supply Collection",
            organization: "Tempe Elementary District",
            location: "South Tempe",
            description: "Donate essential school supplies to students from low-income families. Notebooks, pencils, backpacks, and calculators needed.",
            kind: OpportunityKind::Donation,
            urgency: Urgency::Medium,
            time_commitment: None,
            participants_needed: None,
            coordinates: (33.3950, -111.9400),
            contact_url: "mailto:supplies@tempeschools.org",
            website: "https://www.tempeschools.org",
            categories: &["Education Support", "Donation Drive"],
            date_range: "July - August",
            scope: Scope::Local,
        },
        Entry {
            id: "medical-equipment-drive",
            title: "Desert Medical Equipment Drive",
            organization: "Phoenix Healthcare Coalition",
            location: "Mesa",
            description: "Donate medical equipment such as wheelchairs, walkers, and mobility aids for East Valley community members in need.",
            kind: OpportunityKind::Donation,
            urgency: Urgency::Low,
            time_commitment: None,
            participants_needed: None,
            coordinates: (33.4152, -111.8315),
            contact_url: "mailto:donate@phxhealthcoalition.org",
            website: "https://www.phxhealthcoalition.org",
            categories: &["Community Health", "Donation Drive"],
            date_range: "Ongoing",
            scope: Scope::Regional,
        },
    ]
    .into_iter()
    .map(OpportunityRecord::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn catalog() -> FallbackCatalog {
        FallbackCatalog::default()
    }

    #[test]
    fn test_builtin_ids_unique() {
        let records = builtin_records();
        let ids: HashSet<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn test_unfiltered_pagination() {
        let catalog = catalog();
        let total = catalog.records().len();

        let first = catalog.get_page(&SearchFilters::default(), 1);
        assert_eq!(first.opportunities.len(), 6);
        assert!(first.has_more);
        assert_eq!(first.total_count, total as u64);
        assert_eq!(first.next_cursor, Some(ContinuationToken::fallback(2)));
        assert!(first.previous_cursor.is_none());
        assert_eq!(first.source_kind, SourceKind::Fallback);

        let second = catalog.get_page(&SearchFilters::default(), 2);
        assert_eq!(second.opportunities.len(), total - 6);
        assert!(!second.has_more);
        assert!(second.next_cursor.is_none());
        assert_eq!(second.previous_cursor, Some(ContinuationToken::fallback(1)));
        assert_eq!(second.total_pages, 2);
    }

    #[test]
    fn test_food_keyword_scenario() {
        let catalog = catalog();
        let page = catalog.get_page(&SearchFilters::with_keyword("food"), 1);

        let expected: Vec<&str> = catalog
            .records()
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains("food")
                    || r.description.to_lowercase().contains("food")
                    || r.organization.to_lowercase().contains("food")
                    || r.categories.iter().any(|c| c.to_lowercase().contains("food"))
            })
            .map(|r| r.id.as_str())
            .collect();

        assert_eq!(page.ids(), expected);
        assert_eq!(page.ids(), vec!["asu-food-security", "food-bank-sorting"]);
        assert_eq!(page.current_page, 1);
        assert!(!page.has_more);
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let upper = catalog().get_page(&SearchFilters::with_keyword("FOOD"), 1);
        let lower = catalog().get_page(&SearchFilters::with_keyword("food"), 1);
        assert_eq!(upper.ids(), lower.ids());
    }

    #[test]
    fn test_foreign_country_code_is_empty() {
        let page = catalog().get_page(&SearchFilters::with_location("64", None), 1);
        assert!(page.opportunities.is_empty());
        assert_eq!(page.total_count, 0);
        assert!(!page.has_more);

        let us = catalog().get_page(&SearchFilters::with_location("1", None), 1);
        assert_eq!(us.total_count, catalog().records().len() as u64);
    }

    #[test]
    fn test_region_hint_keeps_everything() {
        let filters = SearchFilters {
            location: Some("Tempe, Arizona".to_string()),
            ..SearchFilters::default()
        };
        let page = catalog().get_page(&filters, 1);
        assert_eq!(page.total_count, catalog().records().len() as u64);
    }

    #[test]
    fn test_region_hint_wins_over_country_code() {
        let total = catalog().records().len() as u64;

        let usa = SearchFilters {
            location: Some("Phoenix, USA".to_string()),
            ..SearchFilters::default()
        };
        assert_eq!(catalog().get_page(&usa, 1).total_count, total);

        let arizona_abroad = SearchFilters {
            location: Some("Arizona".to_string()),
            country_code: Some("64".to_string()),
            ..SearchFilters::default()
        };
        assert_eq!(catalog().get_page(&arizona_abroad, 1).total_count, total);

        let elsewhere = SearchFilters {
            location: Some("Auckland".to_string()),
            country_code: Some("64".to_string()),
            ..SearchFilters::default()
        };
        assert_eq!(catalog().get_page(&elsewhere, 1).total_count, 0);
    }

    #[test]
    fn test_location_substring_filter() {
        let filters = SearchFilters {
            location: Some("phoenix".to_string()),
            ..SearchFilters::default()
        };
        let page = catalog().get_page(&filters, 1);
        assert_eq!(page.ids(), vec!["homeless-outreach", "food-bank-sorting"]);
    }

    #[test]
    fn test_type_and_urgency_filters() {
        let donations = SearchFilters {
            kind: Some(OpportunityKind::Donation),
            ..SearchFilters::default()
        };
        let page = catalog().get_page(&donations, 1);
        assert_eq!(
            page.ids(),
            vec!["school-supply-drive", "medical-equipment-drive"]
        );

        let urgent = SearchFilters {
            urgency: Some(Urgency::High),
            ..SearchFilters::default()
        };
        assert!(
            catalog()
                .get_page(&urgent, 1)
                .opportunities
                .iter()
                .all(|r| r.urgency == Urgency::High)
        );
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = catalog().get_page(&SearchFilters::default(), 9);
        assert!(page.opportunities.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_size_bound() {
        let catalog = FallbackCatalog::new(4);
        for page in 1..=4 {
            assert!(catalog.get_page(&SearchFilters::default(), page).opportunities.len() <= 4);
        }
    }

    #[test]
    fn test_stable_across_instances() {
        assert_eq!(
            FallbackCatalog::default().records(),
            FallbackCatalog::default().records()
        );
    }
}
