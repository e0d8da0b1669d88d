//! Wire format of the remote volunteer directory search API.

use serde::{Deserialize, Deserializer};

/// One page of search results as returned by the directory.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoteSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,

    /// Absolute URL of the next page
    #[serde(default)]
    pub next: Option<String>,

    /// Absolute URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<RemoteOpportunity>,
}

/// A single listing in the directory's own shape.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoteOpportunity {
    pub id: u64,

    #[serde(default)]
    pub url: Option<String>,

    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub remote_or_online: bool,

    pub organization: RemoteOrganization,

    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<RemoteActivity>,

    #[serde(default)]
    pub dates: Option<String>,

    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub audience: RemoteAudience,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoteOrganization {
    pub name: String,

    /// Often protocol-relative (`//cdn...`)
    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoteActivity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RemoteAudience {
    /// "local", "regional" or "national"
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub regions: Option<Vec<String>>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,
}

/// The directory sends `null` for empty fields as often as it omits them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_sparse_listing() {
        let json = r#"{
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 42,
                "url": "https://example.org/opp/42",
                "title": "Sort donations",
                "description": "Help us",
                "remote_or_online": false,
                "organization": {"name": "Food Bank", "logo": null, "url": "https://example.org"},
                "activities": [{"name": "Sorting", "category": "Food Security"}],
                "dates": "Ongoing",
                "duration": null,
                "audience": {"scope": "regional", "regions": ["Calgary"]}
            }]
        }"#;

        let response: RemoteSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.count, 1);
        assert!(response.next.is_none());
        let item = &response.results[0];
        assert_eq!(item.id, 42);
        assert_eq!(item.organization.logo, None);
        assert_eq!(item.audience.regions.as_deref(), Some(&["Calgary".to_string()][..]));
        assert_eq!(item.audience.latitude, None);
    }

    #[test]
    fn test_missing_audience_defaults() {
        let json = r#"{"id": 1, "title": "t", "organization": {"name": "o"}}"#;
        let item: RemoteOpportunity = serde_json::from_str(json).unwrap();
        assert_eq!(item.audience, RemoteAudience::default());
        assert!(item.activities.is_empty());
    }

    #[test]
    fn test_null_fields_keep_the_page() {
        let json = r#"{
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 1, "title": "Pantry", "description": "Sort cans.", "organization": {"name": "Food Bank"},
                 "activities": [{"name": "Sorting", "category": "Food Security"}]},
                {"id": 2, "title": "Greeter", "description": null, "remote_or_online": null,
                 "organization": {"name": "Shelter"}, "activities": null, "audience": null}
            ]
        }"#;

        let response: RemoteSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 2);
        let greeter = &response.results[1];
        assert!(greeter.activities.is_empty());
        assert_eq!(greeter.description, "");
        assert!(!greeter.remote_or_online);
        assert_eq!(greeter.audience, RemoteAudience::default());
    }
}
