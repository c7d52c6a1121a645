//! HTTP-level tests: the Axum router driven with `oneshot` over mock deps.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::common::{dallas_geocoder, init_tracing, ANCHOR_LAT, ANCHOR_LNG, ANCHOR_ZIP};
use marketplace_core::kernel::{ListingFixture, MockGeocoder, MockListingStore, TestDependencies};
use marketplace_core::server::build_app;

fn app() -> Router {
    init_tracing();
    let listings = vec![
        ListingFixture::sell("Desk", 50).minute(-1).build(),
        ListingFixture::give_away("Chair").minute(-2).build(),
        ListingFixture::sell("Far desk", 20).zip("75290").minute(-3).build(),
    ];
    let geocoder = dallas_geocoder().with_reverse(ANCHOR_LAT, ANCHOR_LNG, ANCHOR_ZIP);
    build_app(TestDependencies::new(listings, geocoder).server_deps())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn titles(body: &Value) -> Vec<String> {
    body["listings"]
        .as_array()
        .map(|listings| {
            listings
                .iter()
                .filter_map(|l| l["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok_when_store_answers() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn health_reports_unavailable_store() {
    init_tracing();
    let deps = TestDependencies::new(Vec::new(), MockGeocoder::new())
        .with_store(MockListingStore::unavailable())
        .server_deps();

    let (status, body) = get(build_app(deps), "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["listing_store"]["status"], "error");
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn listings_default_to_newest_first() {
    let (status, body) = get(app(), "/api/listings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Desk", "Chair", "Far desk"]);
    assert_eq!(body["sort"], "newest");
    assert_eq!(body["active_filter_count"], 0);
    assert_eq!(body["proximity"]["status"], "not_requested");
}

#[tokio::test]
async fn listings_apply_query_filters_and_echo_seq() {
    let (status, body) = get(app(), "/api/listings?type=Sell&sort=price-low&seq=7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Far desk", "Desk"]);
    assert_eq!(body["seq"], 7);
    assert_eq!(body["listings"][0]["type"], "Sell");
}

#[tokio::test]
async fn listings_filter_by_location() {
    let (status, body) = get(app(), "/api/listings?location=75201&zip_radius=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Desk", "Chair"]);
    assert_eq!(body["proximity"]["status"], "applied");
}

#[tokio::test]
async fn empty_query_values_mean_no_filter() {
    let (status, body) = get(app(), "/api/listings?type=&category=&search=&location=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body).len(), 3);
}

#[tokio::test]
async fn invalid_sort_is_a_bad_request() {
    let (status, body) = get(app(), "/api/listings?sort=cheapest").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("invalid sort")));
}

// =============================================================================
// Locations
// =============================================================================

#[tokio::test]
async fn zip_lookup_returns_place() {
    let (status, body) = get(app(), "/api/locations/zip/75202").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zip_code"], "75202");
    assert_eq!(body["state"], "TX");
}

#[tokio::test]
async fn unknown_zip_is_not_found() {
    let (status, _) = get(app(), "/api/locations/zip/00000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reverse_geocode_detects_zip() {
    let uri = format!("/api/locations/reverse?lat={}&lng={}", ANCHOR_LAT, ANCHOR_LNG);
    let (status, body) = get(app(), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zip_code"], ANCHOR_ZIP);
}

#[tokio::test]
async fn reverse_geocode_miss_asks_for_manual_entry() {
    let (status, body) = get(app(), "/api/locations/reverse?lat=47.6&lng=-122.3").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("enter your ZIP code manually")));
}

#[tokio::test]
async fn reverse_geocode_outage_is_a_bad_gateway() {
    init_tracing();
    let geocoder = dallas_geocoder().failing_reverse();
    let app = build_app(TestDependencies::new(Vec::new(), geocoder).server_deps());
    let uri = format!("/api/locations/reverse?lat={}&lng={}", ANCHOR_LAT, ANCHOR_LNG);

    let (status, body) = get(app, &uri).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("enter your ZIP code manually")));
}

#[tokio::test]
async fn nearby_communities_are_listed_closest_first() {
    let (status, body) = get(app(), "/api/locations/nearby?zip=75201&radius=20").await;

    assert_eq!(status, StatusCode::OK);
    let zips: Vec<&str> = body
        .as_array()
        .map(|c| c.iter().filter_map(|v| v["zip_code"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(zips, vec!["75202", "75204", "75230"]);
}
