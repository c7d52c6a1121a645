//! Geography fixtures shared by the integration tests.
//!
//! ZIPs are placed due north of a downtown Dallas anchor so a distance in
//! miles maps onto a latitude offset.

use marketplace_core::kernel::MockGeocoder;

pub const ANCHOR_ZIP: &str = "75201";
pub const ANCHOR_LAT: f64 = 32.7870;
pub const ANCHOR_LNG: f64 = -96.7990;

/// Miles per degree of latitude at the geocoder's earth radius
const MILES_PER_DEGREE: f64 = 69.09;

/// Geocoder that knows only the anchor
pub fn anchor_geocoder() -> MockGeocoder {
    MockGeocoder::new().with_zip(ANCHOR_ZIP, ANCHOR_LAT, ANCHOR_LNG)
}

/// Register `zip` roughly `miles` north of the anchor
pub fn north_of_anchor(geocoder: MockGeocoder, zip: &str, miles: f64) -> MockGeocoder {
    geocoder.with_zip(zip, ANCHOR_LAT + miles / MILES_PER_DEGREE, ANCHOR_LNG)
}

/// Anchor plus a few neighbours: 75202 at 1 mi, 75204 at 3 mi, 75230 at 12 mi,
/// 75290 at 60 mi
pub fn dallas_geocoder() -> MockGeocoder {
    let geocoder = anchor_geocoder();
    let geocoder = north_of_anchor(geocoder, "75202", 1.0);
    let geocoder = north_of_anchor(geocoder, "75204", 3.0);
    let geocoder = north_of_anchor(geocoder, "75230", 12.0);
    north_of_anchor(geocoder, "75290", 60.0)
}
