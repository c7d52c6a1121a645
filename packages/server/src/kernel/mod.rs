//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{DatabaseGeocoder, GeocodeAdapter, PostgresListingStore, ServerDeps};
pub use test_dependencies::{
    fixture_epoch, ListingFixture, MockGeocoder, MockListingStore, TestDependencies,
};
pub use traits::*;
