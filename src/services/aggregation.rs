// src/services/aggregation.rs

//! Remote-first aggregation with transparent fallback.
//!
//! Every call returns a usable [`PageResult`]. Remote failures are logged,
//! recorded on the availability tracker and answered from the fallback
//! catalog instead.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::{FetchError, Result};
use crate::models::{
    Config, ContinuationToken, Cursor, OpportunityRecord, PageResult, RemoteSearchResponse,
    SearchFilters, SourceKind, total_pages,
};
use crate::services::availability::{AvailabilityTracker, Clock, SystemClock};
use crate::services::catalog::FallbackCatalog;
use crate::services::normalize::ResponseNormalizer;
use crate::services::remote::{OpportunitySource, RemoteFetcher};
use crate::utils::page_from_url;

/// Where the service is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Idle,
    CheckingRemote,
    UsingRemote,
    UsingFallback,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::CheckingRemote => "checking remote",
            Self::UsingRemote => "using remote",
            Self::UsingFallback => "using fallback",
        };
        f.write_str(s)
    }
}

/// What to ask the remote for.
enum RemoteRequest<'a> {
    Search,
    Follow(&'a str),
}

/// Records and total count for one location lookup.
#[derive(Debug, Clone)]
pub struct LocationResult {
    pub opportunities: Vec<OpportunityRecord>,
    pub total_count: u64,
    pub source_kind: SourceKind,
}

/// Orchestrates remote fetch, normalization and fallback.
pub struct AggregationService {
    source: Arc<dyn OpportunitySource>,
    normalizer: ResponseNormalizer,
    catalog: FallbackCatalog,
    tracker: Arc<AvailabilityTracker>,
    clock: Arc<dyn Clock>,
    state: Mutex<ServiceState>,
}

impl AggregationService {
    pub fn new(
        source: Arc<dyn OpportunitySource>,
        catalog: FallbackCatalog,
        tracker: Arc<AvailabilityTracker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            normalizer: ResponseNormalizer,
            catalog,
            tracker,
            clock,
            state: Mutex::new(ServiceState::Idle),
        }
    }

    /// Build the production service: HTTP fetcher, built-in catalog, the
    /// process-wide tracker and the wall clock.
    ///
    /// The first service built in a process installs the tracker with the
    /// configured recheck interval; later ones share it.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let fetcher = RemoteFetcher::new(config.remote.clone())?;

        let configured = Arc::new(AvailabilityTracker::with_interval(
            config.availability.recheck_interval(),
        ));
        if !AvailabilityTracker::install_global(configured) {
            log::debug!("Availability tracker already installed, sharing it");
        }

        Ok(Self::new(
            Arc::new(fetcher),
            FallbackCatalog::new(config.catalog.page_size),
            AvailabilityTracker::global(),
            Arc::new(SystemClock),
        ))
    }

    pub fn state(&self) -> ServiceState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn set_state(&self, state: ServiceState) {
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = state;
    }

    pub fn catalog(&self) -> &FallbackCatalog {
        &self.catalog
    }

    pub fn tracker(&self) -> &Arc<AvailabilityTracker> {
        &self.tracker
    }

    /// Fetch one page.
    ///
    /// Without a cursor the page named by `filters.page` is fetched. With one,
    /// the listing it came from is continued: fallback cursors stay on the
    /// catalog, remote cursors follow the directory's own `next` link and
    /// restart at fallback page 1 if that fails.
    pub async fn fetch(
        &self,
        filters: &SearchFilters,
        cursor: Option<&ContinuationToken>,
    ) -> PageResult {
        let filters = filters.normalized();

        match cursor.map(|token| &token.0) {
            None => {
                let page = filters.page_number();
                self.fetch_remote(&filters, RemoteRequest::Search, page, page)
                    .await
            }
            Some(Cursor::Remote { url }) => {
                let page = page_from_url(url).unwrap_or(1);
                self.fetch_remote(&filters, RemoteRequest::Follow(url), page, 1)
                    .await
            }
            Some(Cursor::Fallback { page }) => {
                log::debug!("Continuing fallback listing at page {}", page);
                self.fallback_page(&filters, *page)
            }
        }
    }

    async fn fetch_remote(
        &self,
        filters: &SearchFilters,
        request: RemoteRequest<'_>,
        remote_page: u32,
        fallback_page: u32,
    ) -> PageResult {
        let now = self.clock.now();
        if !self.tracker.should_attempt_remote(now) {
            log::info!("Remote recently unreachable, skipping attempt");
            return self.fallback_page(filters, fallback_page);
        }

        self.set_state(ServiceState::CheckingRemote);
        let result = match request {
            RemoteRequest::Search => self.source.search(filters).await,
            RemoteRequest::Follow(url) => self.source.follow(url).await,
        };

        match result {
            Ok(response) => {
                self.tracker.record_success(now);
                self.set_state(ServiceState::UsingRemote);
                self.remote_page(filters, response, remote_page)
            }
            Err(err) => {
                self.on_remote_failure(&err, now);
                self.fallback_page(filters, fallback_page)
            }
        }
    }

    fn on_remote_failure(&self, err: &FetchError, now: DateTime<Utc>) {
        log::warn!("Remote fetch failed ({}), serving fallback catalog", err);
        self.tracker.record_failure(now);
    }

    fn remote_page(
        &self,
        filters: &SearchFilters,
        response: RemoteSearchResponse,
        current_page: u32,
    ) -> PageResult {
        let page_len = response.results.len();
        let opportunities: Vec<OpportunityRecord> = self
            .normalizer
            .normalize_page(&response.results)
            .into_iter()
            .filter(|record| filters.accepts(record))
            .collect();

        let has_more = response.next.is_some();
        let total_pages = if has_more {
            total_pages(response.count, page_len).max(current_page.saturating_add(1))
        } else {
            current_page
        };

        PageResult {
            opportunities,
            total_count: response.count,
            has_more,
            next_cursor: response.next.map(ContinuationToken::remote),
            previous_cursor: response.previous.map(ContinuationToken::remote),
            current_page,
            total_pages,
            source_kind: SourceKind::Remote,
        }
    }

    fn fallback_page(&self, filters: &SearchFilters, page: u32) -> PageResult {
        self.set_state(ServiceState::UsingFallback);
        self.catalog.get_page(filters, page)
    }

    /// Probe the remote and record the outcome. Returns whether it answered.
    pub async fn check_remote_status(&self) -> bool {
        let now = self.clock.now();
        match self.source.probe().await {
            Ok(()) => {
                self.tracker.record_success(now);
                true
            }
            Err(err) => {
                log::warn!("Remote probe failed: {}", err);
                self.tracker.record_failure(now);
                false
            }
        }
    }

    /// Look a record up on the default first page. When that page came from
    /// the fallback catalog, the whole catalog is searched.
    pub async fn find_by_id(&self, id: &str) -> Option<OpportunityRecord> {
        let page = self.fetch(&SearchFilters::default(), None).await;
        let degraded = page.degraded();
        page.opportunities
            .into_iter()
            .find(|record| record.id == id)
            .or_else(|| {
                degraded
                    .then(|| self.catalog.find(id).cloned())
                    .flatten()
            })
    }

    /// First page of opportunities for a country/area pair.
    pub async fn fetch_by_location(
        &self,
        country_code: &str,
        area_code: Option<&str>,
    ) -> LocationResult {
        let filters = SearchFilters::with_location(country_code, area_code.map(str::to_string));
        let page = self.fetch(&filters, None).await;
        LocationResult {
            opportunities: page.opportunities,
            total_count: page.total_count,
            source_kind: page.source_kind,
        }
    }
}
