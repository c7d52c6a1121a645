use anyhow::Result;
use thiserror::Error;
use tracing::{error, instrument};

use crate::common::utils::{is_five_digit_zip, Coordinates};
use crate::kernel::{BaseGeocoder, ZipPlace};

#[derive(Debug, Error)]
pub enum DetectZipError {
    /// The geocoder answered but had no postal code for the position
    #[error("Could not detect your current location. Please enter your ZIP code manually.")]
    NotFound,

    /// The geocoder could not be reached or returned garbage
    #[error("Could not detect your current location. Please enter your ZIP code manually.")]
    Lookup(#[source] anyhow::Error),
}

/// City, state and centroid for a ZIP code
///
/// Malformed ZIPs are reported as not found without calling the geocoder.
#[instrument(skip(geocoder))]
pub async fn lookup_zip_place(zip: &str, geocoder: &dyn BaseGeocoder) -> Result<Option<ZipPlace>> {
    let zip = zip.trim();
    if !is_five_digit_zip(zip) {
        return Ok(None);
    }
    geocoder.lookup_zip(zip).await
}

/// Auto-detect the ZIP code for a device position
#[instrument(skip(geocoder))]
pub async fn detect_zip(
    at: Coordinates,
    geocoder: &dyn BaseGeocoder,
) -> std::result::Result<String, DetectZipError> {
    match geocoder.reverse_geocode(at).await {
        Ok(Some(zip)) if !zip.trim().is_empty() => Ok(zip.trim().to_string()),
        Ok(_) => Err(DetectZipError::NotFound),
        Err(e) => {
            error!(error = %e, "Reverse geocoding failed");
            Err(DetectZipError::Lookup(e))
        }
    }
}
