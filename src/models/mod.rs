// src/models/mod.rs

//! Domain models for the opportunity aggregator.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod filters;
mod opportunity;
mod page;
mod remote;

// Re-export all public types
pub use config::{AvailabilityConfig, CatalogConfig, Config, RemoteConfig};
pub use filters::SearchFilters;
pub use opportunity::{Coordinates, OpportunityKind, OpportunityRecord, Scope, Urgency};
pub(crate) use page::Cursor;
pub use page::{ContinuationToken, PageResult, SourceKind, total_pages};
pub use remote::{
    RemoteActivity, RemoteAudience, RemoteOpportunity, RemoteOrganization, RemoteSearchResponse,
};
