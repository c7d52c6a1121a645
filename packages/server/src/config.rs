use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::domains::locations::ProximityConfig;

/// Which geocoder answers ZIP lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocoderBackend {
    /// Public HTTP APIs (Zippopotam + BigDataCloud)
    Api,
    /// Local `zip_codes` centroid table
    Database,
}

impl FromStr for GeocoderBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(GeocoderBackend::Api),
            "database" | "db" => Ok(GeocoderBackend::Database),
            other => bail!("Invalid geocoder backend: {}", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub geocoder_backend: GeocoderBackend,
    pub geocode_timeout_secs: u64,
    pub zip_lookup_base_url: Option<String>,
    pub reverse_geocode_base_url: Option<String>,
    pub listings_fetch_limit: i64,
    pub proximity: ProximityConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let proximity = ProximityConfig {
            lookup_concurrency: parse_var("GEOCODE_CONCURRENCY", 1)?,
            ..ProximityConfig::default()
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080)?,
            geocoder_backend: parse_var("GEOCODER_BACKEND", GeocoderBackend::Api)?,
            geocode_timeout_secs: parse_var("GEOCODE_TIMEOUT_SECS", 10)?,
            zip_lookup_base_url: env::var("ZIP_LOOKUP_BASE_URL").ok(),
            reverse_geocode_base_url: env::var("REVERSE_GEOCODE_BASE_URL").ok(),
            listings_fetch_limit: parse_var("LISTINGS_FETCH_LIMIT", 50)?,
            proximity,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be valid: {}", name, e)),
        Err(_) => Ok(default),
    }
}
