//! Discovery domain actions
//!
//! - `filter`: predicate conjunction with proximity applied last
//! - `sort`: stable ordering by recency or effective price
//! - `run_discovery`: full pipeline with stale-run detection

pub mod filter;
pub mod run_discovery;
pub mod sort;

pub use filter::{apply_filters, FilterOutcome, ProximityStatus};
pub use run_discovery::{
    run_discovery, run_discovery_at, DiscoveryRequest, DiscoveryResults, DiscoverySession,
    ListingView, STORE_UNAVAILABLE,
};
pub use sort::sort_listings;
