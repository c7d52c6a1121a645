//! Discovery domain - the browse pipeline: fetch → filter → proximity → sort

pub mod activities;
pub mod models;

// Re-export activities
pub use activities::{
    apply_filters, run_discovery, run_discovery_at, sort_listings, DiscoveryRequest,
    DiscoveryResults, DiscoverySession, FilterOutcome, ListingView, ProximityStatus,
    STORE_UNAVAILABLE,
};

// Re-export models
pub use models::{DatePosted, FilterCriteria, Predicate, SortKey};
