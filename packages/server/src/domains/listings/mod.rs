//! Listings domain - marketplace item records (read path only)

pub mod models;

pub use models::listing::{Category, Condition, Listing, ListingStatus, ListingType};
