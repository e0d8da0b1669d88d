// src/services/consumer.rs

//! Incremental-loading state for one presentation surface.
//!
//! Holds the accumulated list and pagination position across `search`,
//! `load_more` and `refresh`. Only one fetch is in flight per instance; a
//! response that was superseded by a newer request is dropped on arrival.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::{ContinuationToken, OpportunityRecord, PageResult, SearchFilters, SourceKind};
use crate::services::aggregation::AggregationService;
use crate::services::geo;

/// What happened to a request once it resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was applied to the list
    Applied,
    /// A newer request was issued meanwhile; the page was dropped
    Discarded,
    /// Nothing to do: already loading, or no further page
    Skipped,
}

/// Status line for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// First fetch in progress, nothing to show yet
    Loading,
    Live { shown: usize, total: u64 },
    /// Showing sample data from the fallback catalog
    Degraded { shown: usize },
    Empty,
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading opportunities..."),
            Self::Live { shown, total } => {
                write!(f, "Showing {shown} of {total} live opportunities")
            }
            Self::Degraded { shown } => write!(
                f,
                "Live directory unavailable, showing {shown} sample opportunities"
            ),
            Self::Empty => f.write_str("No opportunities match your filters"),
        }
    }
}

/// Point-in-time copy of the consumer state.
#[derive(Debug, Clone)]
pub struct ConsumerSnapshot {
    pub filters: SearchFilters,
    pub records: Vec<OpportunityRecord>,
    pub loading: bool,
    pub degraded: bool,
    pub has_more: bool,
    pub total_count: u64,
    pub source_kind: Option<SourceKind>,
}

#[derive(Debug, Default)]
struct Inner {
    filters: SearchFilters,
    records: Vec<OpportunityRecord>,
    seen: HashSet<String>,
    loading: bool,
    degraded: bool,
    has_more: bool,
    next_cursor: Option<ContinuationToken>,
    source_kind: Option<SourceKind>,
    total_count: u64,
    seq: u64,
    resolved_once: bool,
}

impl Inner {
    /// Start a request and return its sequence number.
    fn begin(&mut self) -> u64 {
        self.seq += 1;
        self.loading = true;
        self.seq
    }

    fn replace(&mut self, page: PageResult) {
        self.records.clear();
        self.seen.clear();
        self.append(page);
    }

    fn append(&mut self, page: PageResult) {
        for record in page.opportunities {
            if self.seen.insert(record.id.clone()) {
                self.records.push(record);
            } else {
                log::debug!("Skipping already listed opportunity {}", record.id);
            }
        }
        self.degraded = page.source_kind == SourceKind::Fallback;
        self.has_more = page.has_more;
        self.next_cursor = page.next_cursor;
        self.source_kind = Some(page.source_kind);
        self.total_count = page.total_count;
        self.loading = false;
        self.resolved_once = true;
    }
}

/// Stateful list controller on top of [`AggregationService`].
pub struct ConsumerState {
    service: Arc<AggregationService>,
    inner: Mutex<Inner>,
}

impl ConsumerState {
    pub fn new(service: Arc<AggregationService>) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Replace the filters and, once the first page arrives, the list.
    pub async fn search(&self, filters: SearchFilters) -> LoadOutcome {
        let filters = filters.normalized();
        let seq = {
            let mut inner = self.lock();
            inner.filters = filters.clone();
            inner.begin()
        };

        let page = self.service.fetch(&filters, None).await;
        self.finish(seq, page, |inner, page| inner.replace(page))
    }

    /// Re-run the current filters; the list is swapped only on arrival.
    pub async fn refresh(&self) -> LoadOutcome {
        let filters = self.lock().filters.clone();
        self.search(filters).await
    }

    /// Append the next page. A no-op while loading or at the end.
    pub async fn load_more(&self) -> LoadOutcome {
        let (seq, filters, cursor) = {
            let mut inner = self.lock();
            if inner.loading || !inner.has_more {
                return LoadOutcome::Skipped;
            }
            let Some(cursor) = inner.next_cursor.clone() else {
                return LoadOutcome::Skipped;
            };
            let filters = inner.filters.clone();
            (inner.begin(), filters, cursor)
        };

        let page = self.service.fetch(&filters, Some(&cursor)).await;
        self.finish(seq, page, |inner, page| {
            if inner.source_kind == Some(page.source_kind) {
                inner.append(page);
            } else {
                log::info!(
                    "Listing switched to {} source, replacing accumulated results",
                    page.source_kind
                );
                inner.replace(page);
            }
        })
    }

    fn finish(
        &self,
        seq: u64,
        page: PageResult,
        apply: impl FnOnce(&mut Inner, PageResult),
    ) -> LoadOutcome {
        let mut inner = self.lock();
        if inner.seq != seq {
            log::debug!(
                "Discarding stale response #{} (latest request is #{})",
                seq,
                inner.seq
            );
            return LoadOutcome::Discarded;
        }
        apply(&mut *inner, page);
        LoadOutcome::Applied
    }

    pub fn banner(&self) -> Banner {
        let inner = self.lock();
        if inner.records.is_empty() {
            if inner.loading && !inner.resolved_once {
                Banner::Loading
            } else {
                Banner::Empty
            }
        } else if inner.degraded {
            Banner::Degraded {
                shown: inner.records.len(),
            }
        } else {
            Banner::Live {
                shown: inner.records.len(),
                total: inner.total_count,
            }
        }
    }

    pub fn snapshot(&self) -> ConsumerSnapshot {
        let inner = self.lock();
        ConsumerSnapshot {
            filters: inner.filters.clone(),
            records: inner.records.clone(),
            loading: inner.loading,
            degraded: inner.degraded,
            has_more: inner.has_more,
            total_count: inner.total_count,
            source_kind: inner.source_kind,
        }
    }

    pub fn records(&self) -> Vec<OpportunityRecord> {
        self.lock().records.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    /// Accumulated records that can be drawn on the map.
    pub fn map_pins(&self) -> Vec<OpportunityRecord> {
        let inner = self.lock();
        geo::map_pins(&inner.records).into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::{FetchError, FetchResult};
    use crate::models::RemoteSearchResponse;
    use crate::services::aggregation::tests::{ScriptedSource, response, t0};
    use crate::services::availability::{AvailabilityTracker, ManualClock};
    use crate::services::catalog::FallbackCatalog;
    use crate::services::remote::OpportunitySource;

    fn consumer(source: Arc<dyn OpportunitySource>) -> ConsumerState {
        let service = AggregationService::new(
            source,
            FallbackCatalog::default(),
            Arc::new(AvailabilityTracker::new()),
            Arc::new(ManualClock::new(t0())),
        );
        ConsumerState::new(Arc::new(service))
    }

    fn ids(state: &ConsumerState) -> Vec<String> {
        state.records().into_iter().map(|r| r.id).collect()
    }

    /// Holds back every `follow` and every search for the keyword "slow"
    /// until the gate is opened.
    struct GatedSource {
        gate: Notify,
    }

    #[async_trait]
    impl OpportunitySource for GatedSource {
        async fn search(&self, filters: &SearchFilters) -> FetchResult<RemoteSearchResponse> {
            match filters.keyword.as_deref() {
                Some("slow") => {
                    self.gate.notified().await;
                    Ok(response(&[1, 2], 2, None))
                }
                _ => Ok(response(
                    &[7, 8],
                    4,
                    Some("https://www.volunteerconnector.org/api/search/?page=2"),
                )),
            }
        }

        async fn follow(&self, _page_url: &str) -> FetchResult<RemoteSearchResponse> {
            self.gate.notified().await;
            Ok(response(&[9], 4, None))
        }

        async fn probe(&self) -> FetchResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_search_replaces_list() {
        let state = consumer(Arc::new(ScriptedSource::new([])));
        assert_eq!(state.search(SearchFilters::default()).await, LoadOutcome::Applied);
        assert_eq!(state.records().len(), 6);

        state.search(SearchFilters::with_keyword("food")).await;
        assert_eq!(ids(&state), vec!["asu-food-security", "food-bank-sorting"]);
        assert!(!state.has_more());
    }

    #[tokio::test]
    async fn test_load_more_never_repeats_ids() {
        let next = |page: u32| format!("https://www.volunteerconnector.org/api/search/?page={page}");
        let source = ScriptedSource::new([
            Ok(response(&[1, 2, 3], 6, Some(next(2).as_str()))),
            Ok(response(&[3, 4, 5], 6, Some(next(3).as_str()))),
            Ok(response(&[5, 6], 6, None)),
        ]);
        let state = consumer(Arc::new(source));

        state.search(SearchFilters::default()).await;
        while state.has_more() {
            assert_eq!(state.load_more().await, LoadOutcome::Applied);
        }

        let ids = ids(&state);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[tokio::test]
    async fn test_load_more_walks_fallback_catalog() {
        let state = consumer(Arc::new(ScriptedSource::new([])));
        state.search(SearchFilters::default()).await;
        assert!(state.snapshot().degraded);

        assert_eq!(state.load_more().await, LoadOutcome::Applied);
        assert_eq!(
            state.records().len(),
            FallbackCatalog::default().records().len()
        );
        assert_eq!(state.load_more().await, LoadOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_source_change_replaces_list() {
        let source = ScriptedSource::new([
            Ok(response(
                &[1, 2],
                4,
                Some("https://www.volunteerconnector.org/api/search/?page=2"),
            )),
            Err(FetchError::Network("connection reset".to_string())),
        ]);
        let state = consumer(Arc::new(source));

        state.search(SearchFilters::default()).await;
        assert_eq!(state.snapshot().source_kind, Some(SourceKind::Remote));

        state.load_more().await;
        let snapshot = state.snapshot();
        assert_eq!(snapshot.source_kind, Some(SourceKind::Fallback));
        assert!(snapshot.records.iter().all(|r| r.id != "1" && r.id != "2"));
        assert_eq!(snapshot.records[0].id, "tempe-heat-relief");
    }

    #[tokio::test]
    async fn test_concurrent_load_more_is_noop() {
        let source = Arc::new(GatedSource {
            gate: Notify::new(),
        });
        let state = consumer(source.clone());
        state.search(SearchFilters::default()).await;

        let first = state.load_more();
        let second = async {
            tokio::task::yield_now().await;
            let outcome = state.load_more().await;
            source.gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, LoadOutcome::Applied);
        assert_eq!(second, LoadOutcome::Skipped);
        assert_eq!(ids(&state), vec!["7", "8", "9"]);
    }

    #[tokio::test]
    async fn test_superseded_search_is_discarded() {
        let source = Arc::new(GatedSource {
            gate: Notify::new(),
        });
        let state = consumer(source.clone());

        let slow = state.search(SearchFilters::with_keyword("slow"));
        let fast = async {
            tokio::task::yield_now().await;
            let outcome = state.search(SearchFilters::with_keyword("fast")).await;
            source.gate.notify_one();
            outcome
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow, LoadOutcome::Discarded);
        assert_eq!(fast, LoadOutcome::Applied);
        assert_eq!(ids(&state), vec!["7", "8"]);
        assert_eq!(state.snapshot().filters.keyword.as_deref(), Some("fast"));
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_keeps_filters() {
        let state = consumer(Arc::new(ScriptedSource::new([])));
        state.search(SearchFilters::with_keyword("food")).await;
        let before = ids(&state);

        assert_eq!(state.refresh().await, LoadOutcome::Applied);
        assert_eq!(ids(&state), before);
    }

    #[tokio::test]
    async fn test_refresh_keeps_list_until_page_arrives() {
        let source = Arc::new(GatedSource {
            gate: Notify::new(),
        });
        let state = consumer(source.clone());

        let first = state.search(SearchFilters::with_keyword("slow"));
        let open = async {
            tokio::task::yield_now().await;
            source.gate.notify_one();
        };
        tokio::join!(first, open);
        assert_eq!(ids(&state), vec!["1", "2"]);

        let refresh = state.refresh();
        let observe = async {
            tokio::task::yield_now().await;
            let during = (ids(&state), state.is_loading());
            source.gate.notify_one();
            during
        };
        let (outcome, during) = tokio::join!(refresh, observe);

        assert_eq!(during, (vec!["1".to_string(), "2".to_string()], true));
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(ids(&state), vec!["1", "2"]);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_loading_banner_only_before_first_page() {
        let source = Arc::new(GatedSource {
            gate: Notify::new(),
        });
        let state = consumer(source.clone());

        let first = state.search(SearchFilters::with_keyword("slow"));
        let observe = async {
            tokio::task::yield_now().await;
            let during = state.banner();
            source.gate.notify_one();
            during
        };
        let (_, during) = tokio::join!(first, observe);
        assert_eq!(during, Banner::Loading);
        assert_eq!(state.banner(), Banner::Live { shown: 2, total: 2 });

        let second = state.search(SearchFilters::with_keyword("slow"));
        let observe = async {
            tokio::task::yield_now().await;
            let during = (state.banner(), state.is_loading());
            source.gate.notify_one();
            during
        };
        let (_, during) = tokio::join!(second, observe);
        assert_eq!(during, (Banner::Live { shown: 2, total: 2 }, true));
    }

    #[tokio::test]
    async fn test_banner_states() {
        let state = consumer(Arc::new(ScriptedSource::new([Ok(response(
            &[1, 2],
            120,
            None,
        ))])));
        assert_eq!(state.banner(), Banner::Empty);

        state.search(SearchFilters::default()).await;
        assert_eq!(state.banner(), Banner::Live { shown: 2, total: 120 });

        // Script exhausted, so this one degrades.
        state.search(SearchFilters::default()).await;
        assert_eq!(state.banner(), Banner::Degraded { shown: 6 });

        state.search(SearchFilters::with_keyword("no such thing")).await;
        assert_eq!(state.banner(), Banner::Empty);
    }

    #[tokio::test]
    async fn test_map_pins_from_accumulated_list() {
        let state = consumer(Arc::new(ScriptedSource::new([])));
        state.search(SearchFilters::default()).await;
        assert_eq!(state.map_pins().len(), 6);
    }
}
