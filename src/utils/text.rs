//! Text cleanup helpers.

/// Maximum description length in characters, excluding the ellipsis.
pub const DESCRIPTION_LIMIT: usize = 300;

/// Marker appended to descriptions that were longer than the limit.
pub const ELLIPSIS: char = '…';

/// Collapse every whitespace run (including newlines) to a single space and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a description for display.
///
/// The ellipsis is appended whenever the raw input exceeded the limit, so the
/// result is never longer than `DESCRIPTION_LIMIT + 1` characters.
pub fn clean_description(raw: &str) -> String {
    let mut cleaned: String = normalize_whitespace(raw)
        .chars()
        .take(DESCRIPTION_LIMIT)
        .collect();

    if raw.chars().count() > DESCRIPTION_LIMIT {
        // Cutting mid-word can leave a trailing space before the marker.
        cleaned.truncate(cleaned.trim_end().len());
        cleaned.push(ELLIPSIS);
    }
    cleaned
}
