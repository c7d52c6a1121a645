use anyhow::Result;
use sqlx::PgPool;

use crate::kernel::ZipPlace;

/// Reference record for zip code lat/lng lookups and proximity search
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ZipCode {
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ZipCode {
    pub async fn find_by_code(zip: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT zip_code, city, state, latitude, longitude FROM zip_codes WHERE zip_code = $1",
        )
        .bind(zip)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Closest centroid to a point (equirectangular ordering is enough to pick the nearest)
    pub async fn find_nearest(latitude: f64, longitude: f64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT zip_code, city, state, latitude, longitude
            FROM zip_codes
            ORDER BY POWER(latitude - $1, 2)
                   + POWER((longitude - $2) * COS(RADIANS($1)), 2)
            LIMIT 1
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM zip_codes")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

impl From<ZipCode> for ZipPlace {
    fn from(row: ZipCode) -> Self {
        ZipPlace {
            zip_code: row.zip_code,
            city: row.city,
            state: row.state,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}
