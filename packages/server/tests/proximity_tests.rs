//! Integration tests for nearby-ZIP resolution and the location helpers.

mod common;

use crate::common::{anchor_geocoder, dallas_geocoder, init_tracing, north_of_anchor, ANCHOR_ZIP};
use marketplace_core::domains::locations::{
    nearby_communities, resolve_nearby_zips, ProximityConfig, ProximityError,
};
use marketplace_core::kernel::MockGeocoder;

fn sequential() -> ProximityConfig {
    ProximityConfig::default()
}

fn concurrent(n: usize) -> ProximityConfig {
    ProximityConfig {
        lookup_concurrency: n,
        ..ProximityConfig::default()
    }
}

/// Anchor plus `count` ZIPs right above it, all half a mile away
fn crowded_geocoder(count: u32) -> MockGeocoder {
    (1..=count).fold(anchor_geocoder(), |geocoder, offset| {
        north_of_anchor(geocoder, &format!("{}", 75201 + offset), 0.5)
    })
}

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn accepts_only_candidates_within_radius() {
    init_tracing();
    let resolved = resolve_nearby_zips(ANCHOR_ZIP, 10, &dallas_geocoder(), &sequential())
        .await
        .unwrap();

    let zips: Vec<&str> = resolved
        .nearby
        .iter()
        .map(|n| n.place.zip_code.as_str())
        .collect();
    assert_eq!(zips, vec!["75202", "75204"]);
    assert!(resolved.nearby.iter().all(|n| n.distance_miles <= 10.0));
    assert!(resolved.contains(ANCHOR_ZIP));
    // Full window evaluated: 200 candidates, anchor excluded
    assert_eq!(resolved.candidates_evaluated, 200);
}

#[tokio::test]
async fn sequential_lookups_follow_candidate_order() {
    init_tracing();
    let geocoder = dallas_geocoder();
    resolve_nearby_zips(ANCHOR_ZIP, 10, &geocoder, &sequential())
        .await
        .unwrap();

    let calls = geocoder.lookup_calls();
    assert_eq!(calls.len(), 201);
    assert_eq!(calls[0], ANCHOR_ZIP);
    assert_eq!(calls[1], "75101");
    assert_eq!(calls[200], "75301");
    assert!(!calls[1..].contains(&ANCHOR_ZIP.to_string()));
    assert_eq!(geocoder.max_in_flight(), 1);
}

#[tokio::test]
async fn stops_after_twenty_accepted() {
    init_tracing();
    let geocoder = crowded_geocoder(30);

    let resolved = resolve_nearby_zips(ANCHOR_ZIP, 5, &geocoder, &sequential())
        .await
        .unwrap();

    assert_eq!(resolved.nearby.len(), 20);
    assert!(resolved.hit_cap(&sequential()));
    assert_eq!(resolved.nearby[0].place.zip_code, "75202");
    assert_eq!(resolved.nearby[19].place.zip_code, "75221");
    // 100 empty candidates below the anchor, then 20 hits
    assert_eq!(resolved.candidates_evaluated, 120);
    assert!(!geocoder.lookup_calls().contains(&"75222".to_string()));
}

#[tokio::test]
async fn failing_candidates_count_as_not_nearby() {
    init_tracing();
    let geocoder = dallas_geocoder().failing_on("75202");

    let resolved = resolve_nearby_zips(ANCHOR_ZIP, 10, &geocoder, &sequential())
        .await
        .unwrap();

    let zips: Vec<&str> = resolved
        .nearby
        .iter()
        .map(|n| n.place.zip_code.as_str())
        .collect();
    assert_eq!(zips, vec!["75204"]);
}

#[tokio::test]
async fn unknown_anchor_is_an_error() {
    init_tracing();
    let err = resolve_nearby_zips("99999", 10, &dallas_geocoder(), &sequential())
        .await
        .unwrap_err();
    assert!(matches!(err, ProximityError::AnchorNotFound(ref zip) if zip == "99999"));
}

#[tokio::test]
async fn failing_anchor_lookup_is_an_error() {
    init_tracing();
    let geocoder = dallas_geocoder().failing_on(ANCHOR_ZIP);
    let err = resolve_nearby_zips(ANCHOR_ZIP, 10, &geocoder, &sequential())
        .await
        .unwrap_err();
    assert!(matches!(err, ProximityError::AnchorLookup { .. }));
}

#[tokio::test]
async fn malformed_anchor_is_rejected_without_lookups() {
    init_tracing();
    let geocoder = dallas_geocoder();
    let err = resolve_nearby_zips("752", 10, &geocoder, &sequential())
        .await
        .unwrap_err();
    assert!(matches!(err, ProximityError::InvalidAnchor(_)));
    assert!(geocoder.lookup_calls().is_empty());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_lookups_produce_the_sequential_result() {
    init_tracing();
    let expected = resolve_nearby_zips(ANCHOR_ZIP, 5, &crowded_geocoder(30), &sequential())
        .await
        .unwrap();

    let geocoder = crowded_geocoder(30);
    let resolved = resolve_nearby_zips(ANCHOR_ZIP, 5, &geocoder, &concurrent(8))
        .await
        .unwrap();

    assert_eq!(resolved, expected);
    assert!(geocoder.max_in_flight() > 1);
    assert!(geocoder.max_in_flight() <= 8);
}

#[tokio::test]
async fn zero_concurrency_is_treated_as_sequential() {
    init_tracing();
    let geocoder = dallas_geocoder();
    let resolved = resolve_nearby_zips(ANCHOR_ZIP, 10, &geocoder, &concurrent(0))
        .await
        .unwrap();

    assert_eq!(resolved.nearby.len(), 2);
    assert_eq!(geocoder.max_in_flight(), 1);
}

// =============================================================================
// Nearby communities
// =============================================================================

#[tokio::test]
async fn communities_are_capped_at_ten_and_sorted_by_distance() {
    init_tracing();
    // 75202 is farthest, 75213 closest; only the first ten in window order count
    let geocoder = (1..=12u32).fold(anchor_geocoder(), |geocoder, offset| {
        let miles = 13.0 - f64::from(offset);
        north_of_anchor(geocoder, &format!("{}", 75201 + offset), miles)
    });

    let communities = nearby_communities(ANCHOR_ZIP, 25, &geocoder, &sequential()).await;

    assert_eq!(communities.len(), 10);
    assert_eq!(communities[0].zip_code, "75211");
    assert_eq!(communities[9].zip_code, "75202");
    assert!(communities
        .windows(2)
        .all(|pair| pair[0].distance <= pair[1].distance));
    assert!(!communities.iter().any(|c| c.zip_code == "75213"));
    for community in &communities {
        let tenths = community.distance * 10.0;
        assert!((tenths - tenths.round()).abs() < 1e-9);
        assert_eq!(community.state, "TX");
    }
}

#[tokio::test]
async fn communities_for_unknown_anchor_are_empty() {
    init_tracing();
    let communities = nearby_communities("99999", 25, &dallas_geocoder(), &sequential()).await;
    assert!(communities.is_empty());
}
