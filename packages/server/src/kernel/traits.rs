// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Filtering, proximity and sorting live in the domains and take these traits.
//
// Naming convention: Base* for trait names (e.g., BaseGeocoder, BaseListingStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::utils::Coordinates;
use crate::domains::listings::Listing;

pub use geocode_client::ZipPlace;

// =============================================================================
// Geocoder Trait (Infrastructure - ZIP centroids and reverse geocoding)
// =============================================================================

#[async_trait]
pub trait BaseGeocoder: Send + Sync {
    /// Resolve a ZIP code to its place and centroid. Unknown ZIPs are `Ok(None)`.
    async fn lookup_zip(&self, zip: &str) -> Result<Option<ZipPlace>>;

    /// Resolve coordinates to the postal code that contains them
    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<String>>;

    /// Centroid only (convenience over `lookup_zip`)
    async fn coordinates_for_zip(&self, zip: &str) -> Result<Option<Coordinates>> {
        Ok(self
            .lookup_zip(zip)
            .await?
            .map(|place| Coordinates::new(place.latitude, place.longitude)))
    }
}

// =============================================================================
// Listing Store Trait (Infrastructure - document store read path)
// =============================================================================

#[async_trait]
pub trait BaseListingStore: Send + Sync {
    /// Most recent active listings, `created_at` descending, at most `limit`
    async fn fetch_recent_active(&self, limit: i64) -> Result<Vec<Listing>>;

    /// Cheap connectivity probe for health checks
    async fn ping(&self) -> Result<()>;
}
