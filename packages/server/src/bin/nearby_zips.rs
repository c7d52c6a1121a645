//! CLI for poking at proximity resolution
//!
//! Talks to the public geocoding APIs directly (no database needed) and prints
//! JSON, so results can be piped into jq.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geocode_client::GeocodeClient;
use marketplace_core::common::utils::Coordinates;
use marketplace_core::domains::locations::{
    detect_zip, lookup_zip_place, nearby_communities, resolve_nearby_zips, ProximityConfig,
};
use marketplace_core::kernel::{BaseGeocoder, GeocodeAdapter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nearby_zips")]
#[command(about = "Resolve ZIP codes near an anchor ZIP")]
struct Cli {
    /// Parallel candidate lookups (1 = sequential)
    #[arg(long, global = true, default_value_t = 1)]
    concurrency: usize,

    /// HTTP timeout per geocoder call, in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ZIP codes within the radius, in resolution order
    Nearby {
        zip: String,
        #[arg(default_value_t = 25)]
        radius: u32,
    },

    /// Up to ten nearby communities, closest first
    Communities {
        zip: String,
        #[arg(default_value_t = 25)]
        radius: u32,
    },

    /// City, state and centroid for one ZIP
    Lookup { zip: String },

    /// ZIP code at a position
    Detect {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,marketplace_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let client = GeocodeClient::new(Duration::from_secs(cli.timeout))
        .context("Failed to build geocode client")?;
    let geocoder: Arc<dyn BaseGeocoder> = Arc::new(GeocodeAdapter::new(Arc::new(client)));

    let config = ProximityConfig {
        lookup_concurrency: cli.concurrency,
        ..ProximityConfig::default()
    };

    let output = match cli.command {
        Commands::Nearby { zip, radius } => {
            let resolved = resolve_nearby_zips(&zip, radius, geocoder.as_ref(), &config)
                .await
                .with_context(|| format!("Failed to resolve ZIPs near {}", zip))?;
            serde_json::to_string_pretty(&resolved)?
        }
        Commands::Communities { zip, radius } => {
            let communities = nearby_communities(&zip, radius, geocoder.as_ref(), &config).await;
            serde_json::to_string_pretty(&communities)?
        }
        Commands::Lookup { zip } => {
            let place = lookup_zip_place(&zip, geocoder.as_ref()).await?;
            serde_json::to_string_pretty(&place)?
        }
        Commands::Detect { lat, lng } => {
            let zip = detect_zip(Coordinates::new(lat, lng), geocoder.as_ref()).await?;
            serde_json::to_string_pretty(&serde_json::json!({ "zip_code": zip }))?
        }
    };

    println!("{}", output);
    Ok(())
}
