// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{BaseGeocoder, BaseListingStore, ServerDeps, ZipPlace};
use crate::common::utils::Coordinates;
use crate::common::{ListingId, UserId};
use crate::domains::listings::{Category, Condition, Listing, ListingStatus, ListingType};
use crate::domains::locations::ProximityConfig;

// =============================================================================
// Mock Geocoder
// =============================================================================

pub struct MockGeocoder {
    places: Mutex<HashMap<String, ZipPlace>>,
    failing: Mutex<HashSet<String>>,
    reverse: Mutex<Vec<(Coordinates, String)>>,
    reverse_fails: bool,
    lookup_calls: Arc<Mutex<Vec<String>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            places: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            reverse: Mutex::new(Vec::new()),
            reverse_fails: false,
            lookup_calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Register a ZIP centroid
    pub fn with_zip(self, zip: &str, latitude: f64, longitude: f64) -> Self {
        self.places.lock().unwrap().insert(
            zip.to_string(),
            ZipPlace {
                zip_code: zip.to_string(),
                city: format!("City {}", zip),
                state: "TX".to_string(),
                latitude,
                longitude,
            },
        );
        self
    }

    /// Register a full place record
    pub fn with_place(self, place: ZipPlace) -> Self {
        self.places
            .lock()
            .unwrap()
            .insert(place.zip_code.clone(), place);
        self
    }

    /// Make lookups for `zip` fail with a transport-style error
    pub fn failing_on(self, zip: &str) -> Self {
        self.failing.lock().unwrap().insert(zip.to_string());
        self
    }

    pub fn with_reverse(self, latitude: f64, longitude: f64, zip: &str) -> Self {
        self.reverse
            .lock()
            .unwrap()
            .push((Coordinates::new(latitude, longitude), zip.to_string()));
        self
    }

    /// Make every reverse lookup fail with a transport-style error
    pub fn failing_reverse(mut self) -> Self {
        self.reverse_fails = true;
        self
    }

    /// Every ZIP passed to `lookup_zip`, in call order
    pub fn lookup_calls(&self) -> Vec<String> {
        self.lookup_calls.lock().unwrap().clone()
    }

    /// Highest number of lookups observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseGeocoder for MockGeocoder {
    async fn lookup_zip(&self, zip: &str) -> Result<Option<ZipPlace>> {
        self.lookup_calls.lock().unwrap().push(zip.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // Let other buffered lookups start before this one resolves
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().contains(zip) {
            return Err(anyhow!("mock geocoder: lookup failed for {}", zip));
        }
        Ok(self.places.lock().unwrap().get(zip).cloned())
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<String>> {
        if self.reverse_fails {
            return Err(anyhow!("mock geocoder: reverse lookup failed"));
        }
        Ok(self
            .reverse
            .lock()
            .unwrap()
            .iter()
            .find(|(c, _)| c.distance_miles(&at) < 1.0)
            .map(|(_, zip)| zip.clone()))
    }
}

// =============================================================================
// Mock Listing Store
// =============================================================================

pub struct MockListingStore {
    listings: Mutex<Vec<Listing>>,
    fail: bool,
    fetch_calls: AtomicUsize,
}

impl MockListingStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: Mutex::new(listings),
            fail: false,
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// A store whose every call fails
    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseListingStore for MockListingStore {
    async fn fetch_recent_active(&self, limit: i64) -> Result<Vec<Listing>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("mock store: connection refused"));
        }

        let mut listings: Vec<Listing> = self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.is_active())
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listings.truncate(limit.max(0) as usize);
        Ok(listings)
    }

    async fn ping(&self) -> Result<()> {
        if self.fail {
            return Err(anyhow!("mock store: connection refused"));
        }
        Ok(())
    }
}

// =============================================================================
// Listing fixtures
// =============================================================================

/// Builder for listings in tests
pub struct ListingFixture {
    listing: Listing,
}

impl ListingFixture {
    fn base(title: &str, listing_type: ListingType, price: Option<Decimal>) -> Self {
        Self {
            listing: Listing {
                id: ListingId::new(),
                user_id: UserId::new(),
                title: title.to_string(),
                description: String::new(),
                category: Category::Other,
                condition: Condition::Good,
                listing_type,
                zip_code: "75201".to_string(),
                price,
                image_url: None,
                status: ListingStatus::Active,
                created_at: fixture_epoch(),
            },
        }
    }

    pub fn sell(title: &str, price: i64) -> Self {
        Self::base(title, ListingType::Sell, Some(Decimal::from(price)))
    }

    pub fn give_away(title: &str) -> Self {
        Self::base(title, ListingType::GiveAway, None)
    }

    pub fn share(title: &str) -> Self {
        Self::base(title, ListingType::Share, None)
    }

    pub fn description(mut self, description: &str) -> Self {
        self.listing.description = description.to_string();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.listing.category = category;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.listing.condition = condition;
        self
    }

    pub fn zip(mut self, zip: &str) -> Self {
        self.listing.zip_code = zip.to_string();
        self
    }

    /// Force a price regardless of type (stray prices on free listings)
    pub fn price(mut self, price: i64) -> Self {
        self.listing.price = Some(Decimal::from(price));
        self
    }

    pub fn owner(mut self, user_id: UserId) -> Self {
        self.listing.user_id = user_id;
        self
    }

    pub fn status(mut self, status: ListingStatus) -> Self {
        self.listing.status = status;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.listing.created_at = created_at;
        self
    }

    /// Created `minutes` after the fixture epoch
    pub fn minute(self, minutes: i64) -> Self {
        self.created_at(fixture_epoch() + Duration::minutes(minutes))
    }

    pub fn build(self) -> Listing {
        self.listing
    }
}

/// Fixed reference instant for fixtures
pub fn fixture_epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Assembles `ServerDeps` from mocks
pub struct TestDependencies {
    pub listing_store: Arc<MockListingStore>,
    pub geocoder: Arc<MockGeocoder>,
    pub proximity: ProximityConfig,
    pub fetch_limit: i64,
}

impl TestDependencies {
    pub fn new(listings: Vec<Listing>, geocoder: MockGeocoder) -> Self {
        Self {
            listing_store: Arc::new(MockListingStore::new(listings)),
            geocoder: Arc::new(geocoder),
            proximity: ProximityConfig::default(),
            fetch_limit: super::deps::DEFAULT_FETCH_LIMIT,
        }
    }

    pub fn with_store(mut self, store: MockListingStore) -> Self {
        self.listing_store = Arc::new(store);
        self
    }

    pub fn with_proximity(mut self, proximity: ProximityConfig) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.listing_store.clone(),
            self.geocoder.clone(),
            self.proximity,
            self.fetch_limit,
        )
    }
}
