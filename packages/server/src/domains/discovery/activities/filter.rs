use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domains::discovery::models::{FilterCriteria, Predicate};
use crate::domains::listings::Listing;
use crate::domains::locations::{resolve_nearby_zips, ProximityConfig};
use crate::kernel::BaseGeocoder;

/// What happened to the proximity step of a filter run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProximityStatus {
    /// No location, or radius 0
    NotRequested,
    Applied {
        anchor: String,
        radius_miles: u32,
        /// Accepted ZIPs excluding the anchor
        nearby_zip_count: usize,
    },
    /// Anchor could not be resolved; listings were left unrestricted by location
    Skipped { anchor: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub listings: Vec<Listing>,
    pub proximity: ProximityStatus,
}

/// Narrow `listings` to those matching every criterion, keeping input order.
///
/// The local predicates run first; proximity runs last because it is the only
/// step that talks to the geocoder. A proximity failure never fails the call.
pub async fn apply_filters(
    listings: Vec<Listing>,
    criteria: &FilterCriteria,
    geocoder: &dyn BaseGeocoder,
    proximity: &ProximityConfig,
    now: DateTime<Utc>,
) -> FilterOutcome {
    let mut filtered = listings;
    for predicate in criteria.local_predicates(now) {
        narrow(&mut filtered, &predicate);
    }

    let Some((anchor, radius_miles)) = criteria.proximity_anchor() else {
        return FilterOutcome {
            listings: filtered,
            proximity: ProximityStatus::NotRequested,
        };
    };

    let status = match resolve_nearby_zips(anchor, radius_miles, geocoder, proximity).await {
        Ok(nearby) => {
            let nearby_zip_count = nearby.nearby.len();
            narrow(&mut filtered, &Predicate::NearZips(nearby.zip_set()));
            ProximityStatus::Applied {
                anchor: anchor.to_string(),
                radius_miles,
                nearby_zip_count,
            }
        }
        Err(e) => {
            warn!(anchor, error = %e, "Proximity filter skipped");
            ProximityStatus::Skipped {
                anchor: anchor.to_string(),
                reason: e.to_string(),
            }
        }
    };

    FilterOutcome {
        listings: filtered,
        proximity: status,
    }
}

fn narrow(listings: &mut Vec<Listing>, predicate: &Predicate) {
    let before = listings.len();
    listings.retain(|l| predicate.matches(l));
    debug!(?predicate, before, after = listings.len(), "Applied filter");
}
