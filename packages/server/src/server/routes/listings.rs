//! Browse endpoint.
//!
//! GET /api/listings?type=Sell&search=chair&location=75201&zip_radius=10&sort=price-low&seq=7
//!
//! Empty parameters mean "no restriction", matching what the filter panel
//! sends for untouched controls. `seq` is echoed back untouched so a client
//! that fires a request per keystroke can drop responses older than the last
//! one it sent.

use std::str::FromStr;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{api_error, ApiError};
use crate::common::UserId;
use crate::domains::discovery::{run_discovery, DiscoveryRequest, DiscoveryResults, FilterCriteria};
use crate::server::app::AxumAppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListingsQuery {
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub date_posted: Option<String>,
    pub search: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub location: Option<String>,
    pub zip_radius: Option<String>,
    pub sort: Option<String>,
    pub viewer: Option<String>,
    pub seq: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ListingsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    #[serde(flatten)]
    pub results: DiscoveryResults,
}

impl ListingsQuery {
    /// Build the pipeline request; the error names the offending parameter
    pub fn into_request(self) -> Result<DiscoveryRequest, String> {
        let defaults = FilterCriteria::default();

        let criteria = FilterCriteria {
            listing_type: parse_opt("type", self.listing_type)?,
            category: parse_opt("category", self.category)?,
            condition: parse_opt("condition", self.condition)?,
            date_posted: parse_opt("date_posted", self.date_posted)?,
            search_term: non_empty(self.search),
            price_min: parse_opt::<Decimal>("price_min", self.price_min)?
                .unwrap_or(defaults.price_min),
            price_max: parse_opt::<Decimal>("price_max", self.price_max)?
                .unwrap_or(defaults.price_max),
            location: non_empty(self.location).map(|l| l.trim().to_string()),
            zip_radius: parse_opt("zip_radius", self.zip_radius)?.unwrap_or(defaults.zip_radius),
        };

        Ok(DiscoveryRequest {
            criteria,
            sort: parse_opt("sort", self.sort)?.unwrap_or_default(),
            viewer: parse_opt::<UserId>("viewer", self.viewer)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_opt<T>(name: &str, value: Option<String>) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("invalid {}: {}", name, e)),
    }
}

/// Filtered, sorted listings
pub async fn listings_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<ListingsQuery>,
) -> Result<Json<ListingsResponse>, ApiError> {
    let seq = query.seq;
    let request = query
        .into_request()
        .map_err(|msg| api_error(StatusCode::BAD_REQUEST, msg))?;

    let results = run_discovery(&request, &state.deps).await;

    Ok(Json(ListingsResponse { seq, results }))
}
