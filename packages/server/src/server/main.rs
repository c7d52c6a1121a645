// Main entry point for the marketplace API server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use geocode_client::{GeocodeClient, DEFAULT_REVERSE_GEOCODE_URL, DEFAULT_ZIP_LOOKUP_URL};
use marketplace_core::domains::locations::ZipCode;
use marketplace_core::kernel::{
    BaseGeocoder, DatabaseGeocoder, GeocodeAdapter, PostgresListingStore, ServerDeps,
};
use marketplace_core::{server::build_app, Config, GeocoderBackend};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,marketplace_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Church Marketplace API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        geocoder = ?config.geocoder_backend,
        lookup_concurrency = config.proximity.lookup_concurrency,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let geocoder = build_geocoder(&config, &pool).await?;

    let deps = ServerDeps::new(
        Arc::new(PostgresListingStore::new(pool)),
        geocoder,
        config.proximity,
        config.listings_fetch_limit,
    );

    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Listings: http://localhost:{}/api/listings", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn build_geocoder(config: &Config, pool: &PgPool) -> Result<Arc<dyn BaseGeocoder>> {
    match config.geocoder_backend {
        GeocoderBackend::Api => {
            let client = GeocodeClient::with_base_urls(
                Duration::from_secs(config.geocode_timeout_secs),
                config
                    .zip_lookup_base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ZIP_LOOKUP_URL.to_string()),
                config
                    .reverse_geocode_base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REVERSE_GEOCODE_URL.to_string()),
            )
            .context("Failed to build geocode client")?;
            Ok(Arc::new(GeocodeAdapter::new(Arc::new(client))))
        }
        GeocoderBackend::Database => {
            let count = ZipCode::count(pool).await.context("Failed to count ZIP codes")?;
            if count == 0 {
                tracing::warn!("zip_codes table is empty; proximity filtering will be skipped");
            } else {
                tracing::info!(zip_codes = count, "Using database geocoder");
            }
            Ok(Arc::new(DatabaseGeocoder::new(pool.clone())))
        }
    }
}
