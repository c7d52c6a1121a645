//! Locations domain - ZIP centroids, proximity resolution and location helpers

pub mod activities;
pub mod models;

pub use activities::{
    candidate_window, detect_zip, lookup_zip_place, nearby_communities, resolve_nearby_zips,
    DetectZipError, NearbyCommunity, NearbyZip, NearbyZips, ProximityConfig, ProximityError,
};
pub use models::ZipCode;
