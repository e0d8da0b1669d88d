//! Helpers for the map collaborator.

use crate::models::{Coordinates, OpportunityRecord};

/// Map center used when a place name is unknown.
pub const DEFAULT_CENTER: Coordinates = Coordinates::new(33.4255, -111.9400);

/// Known place names, in lookup order.
const KNOWN_PLACES: &[(&str, Coordinates)] = &[
    ("Downtown Tempe", Coordinates::new(33.4255, -111.9400)),
    ("ASU Campus", Coordinates::new(33.4242, -111.9281)),
    ("Mill Avenue District", Coordinates::new(33.4254, -111.9408)),
    ("Tempe Town Lake", Coordinates::new(33.4297, -111.9398)),
    ("South Tempe", Coordinates::new(33.3950, -111.9400)),
    ("North Tempe", Coordinates::new(33.4550, -111.9400)),
    ("East Tempe", Coordinates::new(33.4255, -111.9100)),
    ("West Tempe", Coordinates::new(33.4255, -111.9700)),
    ("Mesa", Coordinates::new(33.4152, -111.8315)),
    ("Chandler", Coordinates::new(33.3062, -111.8413)),
    ("Scottsdale", Coordinates::new(33.4942, -111.9261)),
    ("Phoenix", Coordinates::new(33.4484, -112.0740)),
    ("Remote/Online", DEFAULT_CENTER),
];

/// Records that can be drawn as pins, in input order.
pub fn map_pins(records: &[OpportunityRecord]) -> Vec<&OpportunityRecord> {
    records.iter().filter(|r| r.has_coordinates()).collect()
}

/// Resolve a place name against the static lookup table.
///
/// Exact case-insensitive match first, then a substring match in either
/// direction, else [`DEFAULT_CENTER`].
pub fn resolve_coordinates(name: &str) -> Coordinates {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return DEFAULT_CENTER;
    }

    if let Some((_, coords)) = KNOWN_PLACES
        .iter()
        .find(|(place, _)| place.to_lowercase() == needle)
    {
        return *coords;
    }

    KNOWN_PLACES
        .iter()
        .find(|(place, _)| {
            let place = place.to_lowercase();
            needle.contains(&place) || place.contains(&needle)
        })
        .map(|(_, coords)| *coords)
        .unwrap_or(DEFAULT_CENTER)
}

/// Record coordinates, or the resolved position of its location name.
pub fn pin_position(record: &OpportunityRecord) -> Coordinates {
    record
        .coordinates
        .unwrap_or_else(|| resolve_coordinates(&record.location))
}
