//! Location activities
//!
//! - `proximity`: nearby-ZIP resolution around an anchor ZIP
//! - `communities`: nearby communities with city/state and distance
//! - `lookup`: single ZIP lookup and reverse geocoding

pub mod communities;
pub mod lookup;
pub mod proximity;

pub use communities::{nearby_communities, NearbyCommunity};
pub use lookup::{detect_zip, lookup_zip_place, DetectZipError};
pub use proximity::{
    candidate_window, resolve_nearby_zips, NearbyZip, NearbyZips, ProximityConfig,
    ProximityError,
};
