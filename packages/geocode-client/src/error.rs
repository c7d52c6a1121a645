//! Error types for the geocode client.

use thiserror::Error;

/// Result type for geocode client operations.
pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Geocode client errors.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Transport failure (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response other than 404
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}
