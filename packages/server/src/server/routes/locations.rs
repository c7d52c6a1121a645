//! Location helper endpoints.
//!
//! GET /api/locations/zip/:zip              - city/state/centroid for a ZIP
//! GET /api/locations/reverse?lat=..&lng=.. - detect ZIP from device position
//! GET /api/locations/nearby?zip=..&radius= - nearby communities, closest first

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{api_error, ApiError};
use crate::common::utils::Coordinates;
use crate::domains::discovery::models::DEFAULT_ZIP_RADIUS;
use crate::domains::locations::{
    detect_zip, lookup_zip_place, nearby_communities, DetectZipError, NearbyCommunity,
};
use crate::kernel::ZipPlace;
use crate::server::app::AxumAppState;

pub async fn zip_place_handler(
    Extension(state): Extension<AxumAppState>,
    Path(zip): Path<String>,
) -> Result<Json<ZipPlace>, ApiError> {
    match lookup_zip_place(&zip, state.deps.geocoder.as_ref()).await {
        Ok(Some(place)) => Ok(Json(place)),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("ZIP code not found: {}", zip),
        )),
        Err(e) => {
            tracing::error!(zip = %zip, error = %e, "ZIP lookup failed");
            Err(api_error(StatusCode::BAD_GATEWAY, "ZIP lookup failed"))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
pub struct DetectedZip {
    zip_code: String,
}

pub async fn reverse_geocode_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<DetectedZip>, ApiError> {
    let at = Coordinates::new(query.lat, query.lng);
    match detect_zip(at, state.deps.geocoder.as_ref()).await {
        Ok(zip_code) => Ok(Json(DetectedZip { zip_code })),
        Err(e @ DetectZipError::NotFound) => Err(api_error(StatusCode::NOT_FOUND, e.to_string())),
        Err(e @ DetectZipError::Lookup(_)) => Err(api_error(StatusCode::BAD_GATEWAY, e.to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    zip: String,
    radius: Option<u32>,
}

pub async fn nearby_communities_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<NearbyQuery>,
) -> Json<Vec<NearbyCommunity>> {
    let radius = query.radius.unwrap_or(DEFAULT_ZIP_RADIUS);
    Json(
        nearby_communities(
            query.zip.trim(),
            radius,
            state.deps.geocoder.as_ref(),
            &state.deps.proximity,
        )
        .await,
    )
}
