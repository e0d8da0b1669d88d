//! Service layer for the opportunity aggregator.
//!
//! This module contains the business logic for:
//! - Remote availability gating (`AvailabilityTracker`)
//! - Directory requests (`RemoteFetcher`)
//! - Record normalization (`ResponseNormalizer`)
//! - The offline catalog (`FallbackCatalog`)
//! - Remote-first aggregation (`AggregationService`)
//! - Incremental list state (`ConsumerState`)

mod aggregation;
mod availability;
mod catalog;
mod consumer;
mod geo;
mod normalize;
mod remote;
mod submission;

pub use aggregation::{AggregationService, LocationResult, ServiceState};
pub use availability::{
    Availability, AvailabilityState, AvailabilityTracker, Clock, ManualClock,
    RECHECK_INTERVAL_SECS, SystemClock, default_recheck_interval,
};
pub use catalog::{DEFAULT_PAGE_SIZE, FallbackCatalog, builtin_records};
pub use consumer::{Banner, ConsumerSnapshot, ConsumerState, LoadOutcome};
pub use geo::{DEFAULT_CENTER, map_pins, pin_position, resolve_coordinates};
pub use normalize::{ResponseNormalizer, classify_urgency, format_location};
pub use remote::{OpportunitySource, RemoteFetcher, parse_search_response};
pub use submission::SubmissionDraft;
