//! Response cache policy.

use chrono::{DateTime, TimeDelta, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// How responses are cached.
///
/// Only `GET` responses whose status is in `allowable_codes` are stored.
/// With `include_headers` set, request headers are part of the cache key so
/// two users with different bearer tokens never share an entry.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// SQLite file holding cached responses.
    pub path: PathBuf,

    /// Lifetime of a stored response.
    pub expire_after: Duration,

    /// Response statuses eligible for caching.
    pub allowable_codes: Vec<u16>,

    /// Whether request headers contribute to the cache key.
    pub include_headers: bool,
}

impl CacheConfig {
    pub fn new(path: impl Into<PathBuf>, expire_after: Duration) -> Self {
        Self {
            path: path.into(),
            expire_after,
            ..Self::default()
        }
    }

    pub fn is_cacheable(&self, status: u16) -> bool {
        self.allowable_codes.contains(&status)
    }

    /// Expiry of a response stored at `now`.
    ///
    /// Lifetimes beyond chrono's range saturate at [`DateTime::<Utc>::MAX_UTC`].
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::from_std(self.expire_after)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tmp/dataporten_cache.sqlite"),
            expire_after: Duration::from_secs(900),
            allowable_codes: vec![200],
            include_headers: true,
        }
    }
}
