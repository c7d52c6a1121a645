use serde::{Deserialize, Serialize};

/// Earth radius used for every distance in the marketplace (statute miles)
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in miles
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        calculate_distance_miles(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Calculate distance between two coordinates in miles
///
/// Uses the Haversine formula with a 3959 mile Earth radius.
pub fn calculate_distance_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Round a distance to one decimal place for display
pub fn round_to_tenth(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

/// True for exactly five ASCII digits
pub fn is_five_digit_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_distance() {
        // Dallas downtown (75201) to Dallas uptown (75204), a couple of miles apart
        let downtown = Coordinates::new(32.7904, -96.8044);
        let uptown = Coordinates::new(32.8031, -96.7853);

        let distance = downtown.distance_miles(&uptown);
        assert!(distance > 1.0 && distance < 2.0, "got {}", distance);

        // Same location
        assert!(downtown.distance_miles(&downtown) < 1e-9);
    }

    #[test]
    fn distance_uses_mile_radius() {
        // One degree of latitude is ~69.1 miles on a 3959 mile sphere
        let distance = calculate_distance_miles(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_MILES * 1.0_f64.to_radians();
        assert!((distance - expected).abs() < 1e-6);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(12.345), 12.3);
        assert_eq!(round_to_tenth(12.36), 12.4);
        assert_eq!(round_to_tenth(0.04), 0.0);
    }

    #[test]
    fn test_is_five_digit_zip() {
        assert!(is_five_digit_zip("75201"));
        assert!(is_five_digit_zip("00501"));
        assert!(!is_five_digit_zip("7520"));
        assert!(!is_five_digit_zip("75201-1234"));
        assert!(!is_five_digit_zip("7520a"));
        assert!(!is_five_digit_zip(""));
    }
}
