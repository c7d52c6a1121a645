//! Nearby-ZIP resolution
//!
//! There is no ZIP adjacency data behind this: the candidate window is the run
//! of numerically adjacent ZIP codes around the anchor (anchor ± 100), each
//! geocoded and kept when its centroid lies within the radius. Numeric
//! neighbours are not always geographic neighbours, and the search stops after
//! `max_nearby` hits, so the result can under-report. Both limits are kept on
//! purpose and are configurable through [`ProximityConfig`].
//!
//! Cost is one geocoder call per candidate evaluated (up to 200 plus the
//! anchor). Lookups are dispatched through an ordered, bounded stream: with
//! `lookup_concurrency = 1` they run strictly one after another, and with more
//! in flight the accepted set is still identical because results are consumed
//! in candidate order and the early stop is applied in that order.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::common::utils::{is_five_digit_zip, Coordinates};
use crate::kernel::{BaseGeocoder, ZipPlace};

/// Numeric distance either side of the anchor ZIP that is evaluated
pub const CANDIDATE_WINDOW: u32 = 100;

/// Stop after this many accepted candidates
pub const MAX_NEARBY_ZIPS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityConfig {
    pub candidate_window: u32,
    pub max_nearby: usize,
    /// Geocoder lookups in flight at once (1 = sequential)
    pub lookup_concurrency: usize,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            candidate_window: CANDIDATE_WINDOW,
            max_nearby: MAX_NEARBY_ZIPS,
            lookup_concurrency: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProximityError {
    #[error("Anchor ZIP is not a 5-digit code: {0:?}")]
    InvalidAnchor(String),

    #[error("Anchor ZIP not found: {0}")]
    AnchorNotFound(String),

    #[error("Anchor ZIP lookup failed for {zip}: {source}")]
    AnchorLookup {
        zip: String,
        #[source]
        source: anyhow::Error,
    },
}

/// An accepted candidate with its distance from the anchor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyZip {
    #[serde(flatten)]
    pub place: ZipPlace,
    pub distance_miles: f64,
}

/// Result of a proximity resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyZips {
    pub anchor: String,
    pub radius_miles: u32,
    /// Accepted candidates in candidate-window order (anchor excluded)
    pub nearby: Vec<NearbyZip>,
    pub candidates_evaluated: usize,
}

impl NearbyZips {
    /// The anchor always counts as near itself
    pub fn contains(&self, zip: &str) -> bool {
        zip == self.anchor || self.nearby.iter().any(|n| n.place.zip_code == zip)
    }

    /// Accepted ZIPs plus the anchor
    pub fn zip_set(&self) -> HashSet<String> {
        self.nearby
            .iter()
            .map(|n| n.place.zip_code.clone())
            .chain(std::iter::once(self.anchor.clone()))
            .collect()
    }

    pub fn hit_cap(&self, config: &ProximityConfig) -> bool {
        self.nearby.len() >= config.max_nearby
    }
}

/// Numerically adjacent ZIP codes around `anchor`, zero-padded, anchor excluded.
///
/// Values below 00000 or above 99999 are dropped; a malformed anchor yields no
/// candidates.
pub fn candidate_window(anchor: &str, window: u32) -> Vec<String> {
    if !is_five_digit_zip(anchor) {
        return Vec::new();
    }
    let Ok(base) = anchor.parse::<i64>() else {
        return Vec::new();
    };
    let window = i64::from(window);

    (base - window..=base + window)
        .filter(|n| *n != base && (0..=99_999).contains(n))
        .map(|n| format!("{:05}", n))
        .collect()
}

/// Resolve ZIP codes within `radius_miles` of `anchor`.
///
/// Only a failure to resolve the anchor is an error; any individual candidate
/// that cannot be geocoded is treated as not nearby.
#[instrument(skip(geocoder, config), fields(window = config.candidate_window, concurrency = config.lookup_concurrency))]
pub async fn resolve_nearby_zips(
    anchor: &str,
    radius_miles: u32,
    geocoder: &dyn BaseGeocoder,
    config: &ProximityConfig,
) -> Result<NearbyZips, ProximityError> {
    let anchor = anchor.trim();
    if !is_five_digit_zip(anchor) {
        return Err(ProximityError::InvalidAnchor(anchor.to_string()));
    }

    let center = geocoder
        .coordinates_for_zip(anchor)
        .await
        .map_err(|source| ProximityError::AnchorLookup {
            zip: anchor.to_string(),
            source,
        })?
        .ok_or_else(|| ProximityError::AnchorNotFound(anchor.to_string()))?;

    let radius = f64::from(radius_miles);
    let mut nearby: Vec<NearbyZip> = Vec::new();
    let mut evaluated = 0usize;

    let candidates = candidate_window(anchor, config.candidate_window);
    let mut lookups = stream::iter(candidates)
        .map(|zip| async move {
            let result = geocoder.lookup_zip(&zip).await;
            (zip, result)
        })
        .buffered(config.lookup_concurrency.max(1));

    while let Some((zip, result)) = lookups.next().await {
        evaluated += 1;

        match result {
            Ok(Some(place)) => {
                let distance =
                    center.distance_miles(&Coordinates::new(place.latitude, place.longitude));
                if distance <= radius {
                    nearby.push(NearbyZip {
                        place,
                        distance_miles: distance,
                    });
                }
            }
            Ok(None) => {}
            Err(e) => {
                debug!(zip = %zip, error = %e, "Candidate ZIP lookup failed, skipping");
            }
        }

        if nearby.len() >= config.max_nearby {
            break;
        }
    }

    let resolved = NearbyZips {
        anchor: anchor.to_string(),
        radius_miles,
        nearby,
        candidates_evaluated: evaluated,
    };

    if resolved.hit_cap(config) {
        warn!(
            anchor,
            radius_miles,
            cap = config.max_nearby,
            "Nearby ZIP cap reached, result may be incomplete"
        );
    }
    info!(
        anchor,
        radius_miles,
        nearby = resolved.nearby.len(),
        evaluated,
        "Resolved nearby ZIP codes"
    );

    Ok(resolved)
}
