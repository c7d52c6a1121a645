// Church Community Marketplace - Listing Discovery Core
//
// This crate provides the read path of the marketplace: fetching listings,
// filtering them (including ZIP-radius proximity), sorting, and the location
// helpers the browse page relies on. External services sit behind traits in
// `kernel` so the pipeline can be driven by mocks in tests.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
