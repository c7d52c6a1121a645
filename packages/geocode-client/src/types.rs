use serde::{Deserialize, Serialize};

use crate::error::{GeocodeError, Result};

/// Zippopotam `/us/{zip}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ZipLookupResponse {
    #[serde(rename = "post code")]
    pub post_code: String,
    #[serde(default)]
    pub places: Vec<ZipLookupPlace>,
}

/// One place entry of a Zippopotam response. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ZipLookupPlace {
    #[serde(rename = "place name")]
    pub place_name: String,
    pub state: String,
    #[serde(rename = "state abbreviation")]
    pub state_abbreviation: String,
    pub latitude: String,
    pub longitude: String,
}

/// BigDataCloud reverse-geocode-client response (only the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseGeocodeResponse {
    #[serde(default)]
    pub postcode: Option<String>,
}

/// Resolved ZIP code with its centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipPlace {
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ZipLookupResponse {
    /// First place of the response, with coordinates parsed.
    ///
    /// Returns `Ok(None)` when the API answered with an empty place list.
    pub fn into_place(self) -> Result<Option<ZipPlace>> {
        let Some(place) = self.places.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = place
            .latitude
            .trim()
            .parse()
            .map_err(|e| GeocodeError::Parse(format!("invalid latitude {:?}: {}", place.latitude, e)))?;
        let longitude: f64 = place
            .longitude
            .trim()
            .parse()
            .map_err(|e| {
                GeocodeError::Parse(format!("invalid longitude {:?}: {}", place.longitude, e))
            })?;

        Ok(Some(ZipPlace {
            zip_code: self.post_code,
            city: place.place_name,
            state: place.state_abbreviation,
            latitude,
            longitude,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DALLAS: &str = r#"{
        "post code": "75201",
        "country": "United States",
        "country abbreviation": "US",
        "places": [{
            "place name": "Dallas",
            "longitude": "-96.8044",
            "state": "Texas",
            "state abbreviation": "TX",
            "latitude": "32.7904"
        }]
    }"#;

    #[test]
    fn parses_zippopotam_place() {
        let response: ZipLookupResponse = serde_json::from_str(DALLAS).unwrap();
        let place = response.into_place().unwrap().unwrap();

        assert_eq!(place.zip_code, "75201");
        assert_eq!(place.city, "Dallas");
        assert_eq!(place.state, "TX");
        assert!((place.latitude - 32.7904).abs() < 1e-9);
        assert!((place.longitude + 96.8044).abs() < 1e-9);
    }

    #[test]
    fn empty_places_is_not_found() {
        let response: ZipLookupResponse =
            serde_json::from_str(r#"{"post code": "00000", "places": []}"#).unwrap();
        assert!(response.into_place().unwrap().is_none());
    }

    #[test]
    fn garbage_coordinates_are_parse_errors() {
        let body = DALLAS.replace("32.7904", "north-ish");
        let response: ZipLookupResponse = serde_json::from_str(&body).unwrap();
        assert!(matches!(response.into_place(), Err(GeocodeError::Parse(_))));
    }

    #[test]
    fn reverse_response_tolerates_missing_postcode() {
        let response: ReverseGeocodeResponse =
            serde_json::from_str(r#"{"city": "Dallas", "postcode": ""}"#).unwrap();
        assert_eq!(response.postcode.as_deref(), Some(""));

        let response: ReverseGeocodeResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.postcode.is_none());
    }
}
