//! Typed ID definitions for marketplace entities.
//!
//! ```rust,ignore
//! use marketplace_core::common::{ListingId, UserId};
//!
//! let listing_id = ListingId::new();
//! // let wrong: UserId = listing_id; // compile error
//! ```

pub use super::id::Id;

/// Marker type for Listing entities.
pub struct Listing;

/// Marker type for User entities (listing owners and viewers).
pub struct User;

pub type ListingId = Id<Listing>;

pub type UserId = Id<User>;
