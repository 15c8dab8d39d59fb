//! # Dataporten Cache
//!
//! File-backed HTTP response caching for outbound Dataporten API calls.
//!
//! This crate provides:
//! - A SQLite response store with per-entry expiry
//! - Request cache keys over method, URL and request headers
//! - A cache-aware GET client wrapping `reqwest`
//! - A pluggable clock so expiry can be driven deterministically
//!
//! # Example
//!
//! ```ignore
//! use dataporten_cache::{CacheConfig, CachedHttpClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = CacheConfig::default();
//!     let client = CachedHttpClient::open(reqwest::Client::new(), &config)
//!         .await
//!         .unwrap();
//!
//!     // First call reaches the network, the second is served from disk
//!     let first = client.get("https://groups-api.dataporten.no/groups/me/groups", &headers).await?;
//!     let second = client.get("https://groups-api.dataporten.no/groups/me/groups", &headers).await?;
//!     assert!(second.from_cache);
//! }
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod keys;
pub mod store;

pub use client::{CachedHttpClient, CachedResponse};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use keys::request_key;
pub use store::ResponseStore;

/// Error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt cache entry: {0}")]
    Corrupt(String),
}
