use serde::Serialize;
use tracing::{instrument, warn};

use super::proximity::{resolve_nearby_zips, ProximityConfig};
use crate::common::utils::round_to_tenth;
use crate::kernel::BaseGeocoder;

/// At most this many communities are suggested
pub const MAX_COMMUNITIES: usize = 10;

/// A nearby church community suggested for browsing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyCommunity {
    pub zip_code: String,
    pub city: String,
    pub state: String,
    /// Miles from the anchor, one decimal
    pub distance: f64,
}

/// Nearby communities around `zip`, closest first.
///
/// Takes the first ten nearby ZIPs in resolution order, then sorts those by
/// distance. An unresolvable anchor yields an empty list.
#[instrument(skip(geocoder, config))]
pub async fn nearby_communities(
    zip: &str,
    radius_miles: u32,
    geocoder: &dyn BaseGeocoder,
    config: &ProximityConfig,
) -> Vec<NearbyCommunity> {
    let resolved = match resolve_nearby_zips(zip, radius_miles, geocoder, config).await {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(zip, error = %e, "Could not resolve nearby communities");
            return Vec::new();
        }
    };

    let mut communities: Vec<NearbyCommunity> = resolved
        .nearby
        .into_iter()
        .take(MAX_COMMUNITIES)
        .map(|n| NearbyCommunity {
            zip_code: n.place.zip_code,
            city: n.place.city,
            state: n.place.state,
            distance: round_to_tenth(n.distance_miles),
        })
        .collect();

    communities.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    communities
}
