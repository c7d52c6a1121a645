//! Server dependencies for the discovery pipeline (using traits for testability)
//!
//! This module provides the dependency container handed to every pipeline call
//! and the production implementations of the kernel traits.

use anyhow::Result;
use async_trait::async_trait;
use geocode_client::GeocodeClient;
use sqlx::PgPool;
use std::sync::Arc;

use crate::common::utils::Coordinates;
use crate::domains::listings::Listing;
use crate::domains::locations::{ProximityConfig, ZipCode};
use crate::kernel::{BaseGeocoder, BaseListingStore, ZipPlace};

// =============================================================================
// GeocodeClient Adapter (implements BaseGeocoder trait)
// =============================================================================

/// Wrapper around GeocodeClient that implements BaseGeocoder trait
pub struct GeocodeAdapter(pub Arc<GeocodeClient>);

impl GeocodeAdapter {
    pub fn new(client: Arc<GeocodeClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseGeocoder for GeocodeAdapter {
    async fn lookup_zip(&self, zip: &str) -> Result<Option<ZipPlace>> {
        Ok(self.0.lookup_zip(zip).await?)
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<String>> {
        Ok(self.0.reverse_geocode(at.latitude, at.longitude).await?)
    }
}

// =============================================================================
// Database Geocoder (zip_codes centroid table)
// =============================================================================

pub struct DatabaseGeocoder {
    pool: PgPool,
}

impl DatabaseGeocoder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseGeocoder for DatabaseGeocoder {
    async fn lookup_zip(&self, zip: &str) -> Result<Option<ZipPlace>> {
        Ok(ZipCode::find_by_code(zip, &self.pool).await?.map(Into::into))
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<String>> {
        Ok(ZipCode::find_nearest(at.latitude, at.longitude, &self.pool)
            .await?
            .map(|z| z.zip_code))
    }
}

// =============================================================================
// Postgres Listing Store
// =============================================================================

pub struct PostgresListingStore {
    pool: PgPool,
}

impl PostgresListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseListingStore for PostgresListingStore {
    async fn fetch_recent_active(&self, limit: i64) -> Result<Vec<Listing>> {
        Listing::find_recent_active(limit, &self.pool).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Default page size for the listing fetch
pub const DEFAULT_FETCH_LIMIT: i64 = 50;

/// Dependencies passed explicitly into every discovery call
#[derive(Clone)]
pub struct ServerDeps {
    pub listing_store: Arc<dyn BaseListingStore>,
    pub geocoder: Arc<dyn BaseGeocoder>,
    pub proximity: ProximityConfig,
    pub fetch_limit: i64,
}

impl ServerDeps {
    pub fn new(
        listing_store: Arc<dyn BaseListingStore>,
        geocoder: Arc<dyn BaseGeocoder>,
        proximity: ProximityConfig,
        fetch_limit: i64,
    ) -> Self {
        Self {
            listing_store,
            geocoder,
            proximity,
            fetch_limit,
        }
    }
}
