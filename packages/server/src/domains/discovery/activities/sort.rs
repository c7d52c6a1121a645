use crate::domains::discovery::models::SortKey;
use crate::domains::listings::Listing;

/// Sorted copy of `listings`. Stable: ties keep their input order.
pub fn sort_listings(listings: &[Listing], key: SortKey) -> Vec<Listing> {
    let mut sorted = listings.to_vec();
    match key {
        SortKey::Newest => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::PriceLow => sorted.sort_by(|a, b| a.effective_price().cmp(&b.effective_price())),
        SortKey::PriceHigh => {
            sorted.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()))
        }
    }
    sorted
}
