use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;

use crate::common::{ListingId, UserId};

/// Listing - an item offered to the church community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub user_id: UserId,

    // Content
    pub title: String,
    pub description: String,
    pub category: Category,
    pub condition: Condition,
    #[serde(rename = "type")]
    pub listing_type: ListingType,

    // Location anchor (5-digit ZIP)
    pub zip_code: String,

    /// Asking price, only meaningful for `Sell`
    pub price: Option<Decimal>,
    pub image_url: Option<String>,

    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Price used for filtering and sorting: the asking price for sales, zero otherwise.
    ///
    /// A stray `price` on a give-away or share listing is ignored.
    pub fn effective_price(&self) -> Decimal {
        match self.listing_type {
            ListingType::Sell => self.price.unwrap_or(Decimal::ZERO),
            ListingType::GiveAway | ListingType::Share => Decimal::ZERO,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Most recent active listings, newest first
    pub async fn find_recent_active(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT id, user_id, title, description, category, condition, listing_type,
                   zip_code, price, image_url, status, created_at
            FROM listings
            WHERE status = 'active'
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to fetch recent listings")?;

        Ok(decode_rows(rows))
    }
}

/// Rows whose enum columns do not decode are logged and dropped
fn decode_rows(rows: Vec<ListingRow>) -> Vec<Listing> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match Listing::try_from(row) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!(id = %id, error = %e, "Skipping undecodable listing row");
                    None
                }
            }
        })
        .collect()
}

/// Raw `listings` row; enum columns are stored as their display text
#[derive(Debug, Clone, sqlx::FromRow)]
struct ListingRow {
    id: ListingId,
    user_id: UserId,
    title: String,
    description: String,
    category: String,
    condition: String,
    listing_type: String,
    zip_code: String,
    price: Option<Decimal>,
    image_url: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = anyhow::Error;

    fn try_from(row: ListingRow) -> Result<Self> {
        Ok(Listing {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            category: row.category.parse()?,
            condition: row.condition.parse()?,
            listing_type: row.listing_type.parse()?,
            zip_code: row.zip_code,
            price: row.price,
            image_url: row.image_url,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Listing type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ListingType {
    #[serde(rename = "Give Away", alias = "GiveAway", alias = "give_away")]
    GiveAway,
    #[serde(alias = "sell")]
    Sell,
    #[serde(alias = "share")]
    Share,
}

impl std::fmt::Display for ListingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingType::GiveAway => write!(f, "Give Away"),
            ListingType::Sell => write!(f, "Sell"),
            ListingType::Share => write!(f, "Share"),
        }
    }
}

impl std::str::FromStr for ListingType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Give Away" | "GiveAway" | "give_away" => Ok(ListingType::GiveAway),
            "Sell" | "sell" => Ok(ListingType::Sell),
            "Share" | "share" => Ok(ListingType::Share),
            _ => Err(anyhow::anyhow!("Invalid listing type: {}", s)),
        }
    }
}

/// Listing category enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Books & Resources")]
    BooksAndResources,
    #[serde(rename = "Equipment & Tech")]
    EquipmentAndTech,
    Furniture,
    #[serde(rename = "Office Supplies")]
    OfficeSupplies,
    #[serde(rename = "Event Items")]
    EventItems,
    #[serde(rename = "Creative Assets")]
    CreativeAssets,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::BooksAndResources,
        Category::EquipmentAndTech,
        Category::Furniture,
        Category::OfficeSupplies,
        Category::EventItems,
        Category::CreativeAssets,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BooksAndResources => "Books & Resources",
            Category::EquipmentAndTech => "Equipment & Tech",
            Category::Furniture => "Furniture",
            Category::OfficeSupplies => "Office Supplies",
            Category::EventItems => "Event Items",
            Category::CreativeAssets => "Creative Assets",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid category: {}", s))
    }
}

/// Item condition enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Condition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::New => write!(f, "New"),
            Condition::LikeNew => write!(f, "Like New"),
            Condition::Good => write!(f, "Good"),
            Condition::Fair => write!(f, "Fair"),
            Condition::Poor => write!(f, "Poor"),
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "New" => Ok(Condition::New),
            "Like New" => Ok(Condition::LikeNew),
            "Good" => Ok(Condition::Good),
            "Fair" => Ok(Condition::Fair),
            "Poor" => Ok(Condition::Poor),
            _ => Err(anyhow::anyhow!("Invalid condition: {}", s)),
        }
    }
}

/// Listing lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Sold,
    Removed,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingStatus::Active => write!(f, "active"),
            ListingStatus::Sold => write!(f, "sold"),
            ListingStatus::Removed => write!(f, "removed"),
        }
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(ListingStatus::Active),
            "sold" => Ok(ListingStatus::Sold),
            "removed" => Ok(ListingStatus::Removed),
            _ => Err(anyhow::anyhow!("Invalid listing status: {}", s)),
        }
    }
}
