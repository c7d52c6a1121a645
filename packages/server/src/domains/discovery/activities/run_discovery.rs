//! Main discovery pipeline action
//!
//! Pipeline:
//! 1. Fetch the most recent active listings from the store
//! 2. Apply filters (proximity last, via the geocoder)
//! 3. Sort by the requested key
//! 4. Decorate each listing for the viewer
//!
//! Every run is independent: nothing is cached between runs, including the
//! nearby-ZIP set. Runs started through a [`DiscoverySession`] carry a
//! generation number so a slow run that finishes after a newer one started is
//! dropped instead of overwriting fresher results.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::filter::{apply_filters, ProximityStatus};
use super::sort::sort_listings;
use crate::common::UserId;
use crate::domains::discovery::models::{FilterCriteria, SortKey};
use crate::domains::listings::{Listing, ListingType};
use crate::kernel::ServerDeps;

/// Shown to clients when the listing store cannot be read; details stay in the log
pub const STORE_UNAVAILABLE: &str = "Listings are temporarily unavailable";

/// One browse request
#[derive(Debug, Clone, Default)]
pub struct DiscoveryRequest {
    pub criteria: FilterCriteria,
    pub sort: SortKey,
    /// Signed-in user, if any
    pub viewer: Option<UserId>,
}

/// A listing as presented to a particular viewer
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: Listing,
    pub effective_price: Decimal,
    /// The viewer posted this listing
    pub is_own: bool,
    /// Buy button is offered: a sale, a signed-in viewer, and not their own
    pub can_purchase: bool,
}

impl ListingView {
    pub fn for_viewer(listing: Listing, viewer: Option<UserId>) -> Self {
        let is_own = viewer.is_some_and(|v| v == listing.user_id);
        let can_purchase = listing.listing_type == ListingType::Sell && viewer.is_some() && !is_own;
        Self {
            effective_price: listing.effective_price(),
            listing,
            is_own,
            can_purchase,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResults {
    pub listings: Vec<ListingView>,
    /// Listings returned by the store before filtering
    pub total_fetched: usize,
    pub active_filter_count: usize,
    pub sort: SortKey,
    pub proximity: ProximityStatus,
    /// Set when the store fetch failed; `listings` is then empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_error: Option<String>,
}

/// Run the full discovery pipeline against the current time.
pub async fn run_discovery(request: &DiscoveryRequest, deps: &ServerDeps) -> DiscoveryResults {
    run_discovery_at(request, deps, Utc::now()).await
}

/// Run the full discovery pipeline with an explicit "now" (date-posted windows).
///
/// Never fails: store errors come back as an empty result with `store_error`
/// set, geocoder errors as a skipped proximity step.
#[instrument(skip(request, deps), fields(sort = %request.sort, viewer = ?request.viewer))]
pub async fn run_discovery_at(
    request: &DiscoveryRequest,
    deps: &ServerDeps,
    now: DateTime<Utc>,
) -> DiscoveryResults {
    let active_filter_count = request.criteria.active_filter_count();

    let fetched = match deps.listing_store.fetch_recent_active(deps.fetch_limit).await {
        Ok(listings) => listings,
        Err(e) => {
            warn!(error = %e, limit = deps.fetch_limit, "Listing fetch failed");
            return DiscoveryResults {
                listings: Vec::new(),
                total_fetched: 0,
                active_filter_count,
                sort: request.sort,
                proximity: ProximityStatus::NotRequested,
                store_error: Some(STORE_UNAVAILABLE.to_string()),
            };
        }
    };
    let total_fetched = fetched.len();

    let outcome = apply_filters(
        fetched,
        &request.criteria,
        deps.geocoder.as_ref(),
        &deps.proximity,
        now,
    )
    .await;

    let sorted = sort_listings(&outcome.listings, request.sort);

    info!(
        total_fetched,
        matched = sorted.len(),
        active_filter_count,
        "Discovery run complete"
    );

    DiscoveryResults {
        listings: sorted
            .into_iter()
            .map(|l| ListingView::for_viewer(l, request.viewer))
            .collect(),
        total_fetched,
        active_filter_count,
        sort: request.sort,
        proximity: outcome.proximity,
        store_error: None,
    }
}

/// Generation counter for one browsing context (a page, a client connection).
///
/// Each call to [`DiscoverySession::run`] takes a new generation; a run whose
/// generation is no longer the latest when it completes returns `None`.
#[derive(Debug, Default)]
pub struct DiscoverySession {
    generation: AtomicU64,
}

impl DiscoverySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run and return its generation
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    pub async fn run(&self, request: &DiscoveryRequest, deps: &ServerDeps) -> Option<DiscoveryResults> {
        let generation = self.begin();
        let results = run_discovery(request, deps).await;

        if self.is_current(generation) {
            Some(results)
        } else {
            debug!(generation, "Discarding stale discovery results");
            None
        }
    }
}
