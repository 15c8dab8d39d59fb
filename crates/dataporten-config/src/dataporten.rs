//! Dataporten API and cache configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the Dataporten groups API.
pub const DEFAULT_API_URL: &str = "https://groups-api.dataporten.no";

/// File name of the response cache inside `cache_path`.
pub const CACHE_FILE_NAME: &str = "dataporten_cache.sqlite";

/// Dataporten settings loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATAPORTEN_CACHE_REQUESTS`: Cache API responses on disk (default: `true`)
/// - `DATAPORTEN_CACHE_PATH`: Directory holding the cache file (default: `tmp/`)
/// - `DATAPORTEN_CACHE_TTL_SECONDS`: Lifetime of a cached response (default: `900`)
/// - `DATAPORTEN_API_URL`: Base URL of the groups API (default: [`DEFAULT_API_URL`])
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataportenConfig {
    pub cache_requests: bool,
    pub cache_path: PathBuf,
    pub cache_ttl_seconds: u64,
    pub api_url: String,
}

impl DataportenConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            cache_requests: lookup("DATAPORTEN_CACHE_REQUESTS")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.cache_requests),
            cache_path: lookup("DATAPORTEN_CACHE_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            cache_ttl_seconds: lookup("DATAPORTEN_CACHE_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_seconds),
            api_url: lookup("DATAPORTEN_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_url),
        }
    }

    /// Full path of the SQLite file backing the response cache.
    pub fn cache_file(&self) -> PathBuf {
        self.cache_path.join(CACHE_FILE_NAME)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl Default for DataportenConfig {
    fn default() -> Self {
        Self {
            cache_requests: true,
            cache_path: PathBuf::from("tmp/"),
            cache_ttl_seconds: 900, // 15 minutes
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DataportenConfig::from_lookup(|_| None);
        assert_eq!(config, DataportenConfig::default());
        assert!(config.cache_requests);
        assert_eq!(config.cache_ttl(), Duration::from_secs(900));
        assert_eq!(config.cache_file(), PathBuf::from("tmp/dataporten_cache.sqlite"));
    }

    #[test]
    fn test_reads_all_variables() {
        let config = DataportenConfig::from_lookup(lookup_from(&[
            ("DATAPORTEN_CACHE_REQUESTS", "false"),
            ("DATAPORTEN_CACHE_PATH", "/var/cache/dp"),
            ("DATAPORTEN_CACHE_TTL_SECONDS", "60"),
            ("DATAPORTEN_API_URL", "http://localhost:9000/"),
        ]));

        assert!(!config.cache_requests);
        assert_eq!(config.cache_file(), PathBuf::from("/var/cache/dp/dataporten_cache.sqlite"));
        assert_eq!(config.cache_ttl_seconds, 60);
        assert_eq!(config.api_url, "http://localhost:9000");
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = DataportenConfig::from_lookup(lookup_from(&[
            ("DATAPORTEN_CACHE_REQUESTS", "maybe"),
            ("DATAPORTEN_CACHE_TTL_SECONDS", "soon"),
            ("DATAPORTEN_API_URL", "  "),
        ]));

        assert!(config.cache_requests);
        assert_eq!(config.cache_ttl_seconds, 900);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("nah"), None);
    }
}
