use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domains::listings::{Category, Condition, Listing, ListingType};

/// Lower bound of the untouched price slider
pub const DEFAULT_PRICE_MIN: Decimal = Decimal::ZERO;

/// Upper bound of the untouched price slider
pub const DEFAULT_PRICE_MAX: Decimal = Decimal::ONE_THOUSAND;

/// Radius preselected in the filter panel (miles)
pub const DEFAULT_ZIP_RADIUS: u32 = 25;

/// Browse filters, passed in whole on every pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    #[serde(rename = "type")]
    pub listing_type: Option<ListingType>,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub date_posted: Option<DatePosted>,
    pub search_term: Option<String>,
    pub price_min: Decimal,
    pub price_max: Decimal,
    /// Anchor ZIP for proximity filtering
    pub location: Option<String>,
    pub zip_radius: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            listing_type: None,
            category: None,
            condition: None,
            date_posted: None,
            search_term: None,
            price_min: DEFAULT_PRICE_MIN,
            price_max: DEFAULT_PRICE_MAX,
            location: None,
            zip_radius: DEFAULT_ZIP_RADIUS,
        }
    }
}

impl FilterCriteria {
    /// The slider still sits at 0..1000, so price does not restrict anything.
    ///
    /// Anything at or beyond the defaults on both ends counts as untouched.
    pub fn is_price_untouched(&self) -> bool {
        self.price_min <= DEFAULT_PRICE_MIN && self.price_max >= DEFAULT_PRICE_MAX
    }

    /// Anchor ZIP and radius, when proximity filtering is switched on
    pub fn proximity_anchor(&self) -> Option<(&str, u32)> {
        let location = self.location.as_deref().map(str::trim)?;
        if location.is_empty() || self.zip_radius == 0 {
            return None;
        }
        Some((location, self.zip_radius))
    }

    /// Number of filters that differ from the panel defaults (the badge count)
    pub fn active_filter_count(&self) -> usize {
        [
            self.listing_type.is_some(),
            self.category.is_some(),
            self.search_term.as_deref().is_some_and(|s| !s.is_empty()),
            self.condition.is_some(),
            self.date_posted.is_some(),
            self.location.as_deref().is_some_and(|s| !s.trim().is_empty()),
            self.zip_radius != DEFAULT_ZIP_RADIUS,
            self.price_min > DEFAULT_PRICE_MIN,
            self.price_max < DEFAULT_PRICE_MAX,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Every predicate that needs no I/O, in application order
    pub fn local_predicates(&self, now: DateTime<Utc>) -> Vec<Predicate> {
        let mut predicates = vec![Predicate::Active];

        if let Some(listing_type) = self.listing_type {
            predicates.push(Predicate::Type(listing_type));
        }
        if let Some(category) = self.category {
            predicates.push(Predicate::Category(category));
        }
        if let Some(condition) = self.condition {
            predicates.push(Predicate::Condition(condition));
        }
        if let Some(window) = self.date_posted {
            predicates.push(Predicate::PostedSince(window.cutoff(now)));
        }
        if let Some(term) = self.search_term.as_deref().filter(|s| !s.is_empty()) {
            predicates.push(Predicate::Search(term.to_lowercase()));
        }
        if !self.is_price_untouched() {
            predicates.push(Predicate::PriceRange {
                min: self.price_min,
                max: self.price_max,
            });
        }

        predicates
    }
}

/// One narrowing pass over the listing set
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Active,
    Type(ListingType),
    Category(Category),
    Condition(Condition),
    PostedSince(DateTime<Utc>),
    /// Lowercased needle matched against title or description
    Search(String),
    /// Inclusive bounds on effective price
    PriceRange { min: Decimal, max: Decimal },
    /// Accepted ZIPs, anchor included
    NearZips(HashSet<String>),
}

impl Predicate {
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Predicate::Active => listing.is_active(),
            Predicate::Type(t) => listing.listing_type == *t,
            Predicate::Category(c) => listing.category == *c,
            Predicate::Condition(c) => listing.condition == *c,
            Predicate::PostedSince(cutoff) => listing.created_at >= *cutoff,
            Predicate::Search(needle) => {
                listing.title.to_lowercase().contains(needle.as_str())
                    || listing.description.to_lowercase().contains(needle.as_str())
            }
            Predicate::PriceRange { min, max } => {
                let price = listing.effective_price();
                price >= *min && price <= *max
            }
            Predicate::NearZips(zips) => zips.contains(&listing.zip_code),
        }
    }
}

/// "Date posted" window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePosted {
    Today,
    Week,
    Month,
}

impl DatePosted {
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DatePosted::Today => now - Duration::hours(24),
            DatePosted::Week => now - Duration::days(7),
            DatePosted::Month => now - Duration::days(30),
        }
    }
}

impl std::str::FromStr for DatePosted {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "today" => Ok(DatePosted::Today),
            "week" => Ok(DatePosted::Week),
            "month" => Ok(DatePosted::Month),
            _ => Err(anyhow::anyhow!("Invalid date posted window: {}", s)),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Newest => write!(f, "newest"),
            SortKey::Oldest => write!(f, "oldest"),
            SortKey::PriceLow => write!(f, "price-low"),
            SortKey::PriceHigh => write!(f, "price-high"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "price-low" => Ok(SortKey::PriceLow),
            "price-high" => Ok(SortKey::PriceHigh),
            _ => Err(anyhow::anyhow!("Invalid sort key: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_filter_panel() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_price_untouched());
        assert_eq!(criteria.zip_radius, 25);
        assert_eq!(criteria.active_filter_count(), 0);
        assert!(criteria.proximity_anchor().is_none());
    }

    #[test]
    fn proximity_needs_location_and_positive_radius() {
        let mut criteria = FilterCriteria {
            location: Some("75201".to_string()),
            ..Default::default()
        };
        assert_eq!(criteria.proximity_anchor(), Some(("75201", 25)));

        criteria.zip_radius = 0;
        assert!(criteria.proximity_anchor().is_none());

        criteria.zip_radius = 10;
        criteria.location = Some("   ".to_string());
        assert!(criteria.proximity_anchor().is_none());
    }

    #[test]
    fn badge_counts_each_touched_control() {
        let criteria = FilterCriteria {
            listing_type: Some(ListingType::Sell),
            search_term: Some("desk".to_string()),
            price_min: Decimal::from(10),
            price_max: Decimal::from(200),
            zip_radius: 50,
            ..Default::default()
        };
        assert_eq!(criteria.active_filter_count(), 5);
    }

    #[test]
    fn price_predicate_only_when_slider_moved() {
        let now = Utc::now();
        let untouched = FilterCriteria::default().local_predicates(now);
        assert_eq!(untouched, vec![Predicate::Active]);

        let moved = FilterCriteria {
            price_max: Decimal::from(100),
            ..Default::default()
        }
        .local_predicates(now);
        assert!(moved.contains(&Predicate::PriceRange {
            min: Decimal::ZERO,
            max: Decimal::from(100),
        }));
    }

    #[test]
    fn sort_key_parses_wire_names() {
        assert_eq!("price-low".parse::<SortKey>().unwrap(), SortKey::PriceLow);
        assert_eq!(SortKey::default(), SortKey::Newest);
        assert_eq!(
            serde_json::to_string(&SortKey::PriceHigh).unwrap(),
            "\"price-high\""
        );
    }
}
