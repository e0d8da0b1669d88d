//! Uniform page result returned by the aggregation layer.

use std::fmt;

use serde::Serialize;

use crate::models::OpportunityRecord;

/// Where the records of a page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Remote,
    Fallback,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// Opaque pagination token.
///
/// Remote pages continue from the directory's `next` URL, fallback pages
/// from a page number. Only the aggregation layer looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken(pub(crate) Cursor);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Cursor {
    Remote { url: String },
    Fallback { page: u32 },
}

impl ContinuationToken {
    pub(crate) fn remote(url: impl Into<String>) -> Self {
        Self(Cursor::Remote { url: url.into() })
    }

    pub(crate) fn fallback(page: u32) -> Self {
        Self(Cursor::Fallback { page })
    }
}

impl Serialize for ContinuationToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Cursor::Remote { url } => write!(f, "remote:{url}"),
            Cursor::Fallback { page } => write!(f, "fallback:page={page}"),
        }
    }
}

/// One page of opportunities from exactly one source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub opportunities: Vec<OpportunityRecord>,
    pub total_count: u64,
    pub has_more: bool,
    pub next_cursor: Option<ContinuationToken>,
    pub previous_cursor: Option<ContinuationToken>,
    pub current_page: u32,
    pub total_pages: u32,
    pub source_kind: SourceKind,
}

impl PageResult {
    /// Data is coming from the fallback catalog instead of the live directory.
    pub fn degraded(&self) -> bool {
        self.source_kind == SourceKind::Fallback
    }

    pub fn ids(&self) -> Vec<&str> {
        self.opportunities.iter().map(|o| o.id.as_str()).collect()
    }
}

/// Number of pages needed to show `total` items at `page_size` per page.
pub fn total_pages(total: u64, page_size: usize) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(page_size as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(7, 0), 1);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(
            ContinuationToken::fallback(3).to_string(),
            "fallback:page=3"
        );
        assert_eq!(
            serde_json::to_value(ContinuationToken::remote("https://x/?page=2")).unwrap(),
            "remote:https://x/?page=2"
        );
    }
}
