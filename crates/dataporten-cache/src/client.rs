//! Cache-aware HTTP client.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::keys::request_key;
use crate::store::ResponseStore;
use crate::CacheError;

/// Buffered response, either fresh from the network or read back from the store.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub created_at: DateTime<Utc>,
    /// `None` for responses that were not stored.
    pub expires_at: Option<DateTime<Utc>>,
    pub from_cache: bool,
}

impl CachedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// `reqwest` client with a transparent response cache in front of it.
///
/// Without a store every call goes to the network.
#[derive(Clone)]
pub struct CachedHttpClient {
    http: reqwest::Client,
    store: Option<ResponseStore>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CachedHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedHttpClient")
            .field("cached", &self.store.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CachedHttpClient {
    /// Client that never caches.
    pub fn uncached(http: reqwest::Client) -> Self {
        Self {
            http,
            store: None,
            config: CacheConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Opens the store at `config.path` and caches through it.
    ///
    /// # Errors
    ///
    /// Returns the error from [`ResponseStore::open`].
    pub async fn open(http: reqwest::Client, config: &CacheConfig) -> Result<Self, CacheError> {
        let store = ResponseStore::open(&config.path).await?;
        Ok(Self::with_store(http, store, config.clone()))
    }

    pub fn with_store(http: reqwest::Client, store: ResponseStore, config: CacheConfig) -> Self {
        Self {
            http,
            store: Some(store),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> Option<&ResponseStore> {
        self.store.as_ref()
    }

    pub fn is_cached(&self) -> bool {
        self.store.is_some()
    }

    /// Issues a GET, answering from the store when a fresh entry exists.
    ///
    /// Store failures are logged and fall through to the network.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Http` if the network request fails.
    #[instrument(skip(self, headers), fields(cache.hit = tracing::field::Empty))]
    pub async fn get(&self, url: &str, headers: &HeaderMap) -> Result<CachedResponse, CacheError> {
        let Some(store) = &self.store else {
            return self.fetch(url, headers).await;
        };

        let key = request_key(
            "GET",
            url,
            self.config.include_headers.then_some(headers),
        );
        let now = self.clock.now();

        match store.get(&key, now).await {
            Ok(Some(hit)) => {
                tracing::Span::current().record("cache.hit", true);
                debug!(cache.key = %key, "Cache hit");
                return Ok(hit);
            }
            Ok(None) => {
                tracing::Span::current().record("cache.hit", false);
                debug!(cache.key = %key, "Cache miss");
            }
            Err(e) => {
                warn!(cache.key = %key, error = %e, "Cache read failed, bypassing cache");
            }
        }

        let mut response = self.fetch(url, headers).await?;

        if self.config.is_cacheable(response.status) {
            let expires_at = self.config.expires_at(now);
            match store.put(&key, "GET", &response, expires_at).await {
                Ok(()) => response.expires_at = Some(expires_at),
                Err(e) => warn!(cache.key = %key, error = %e, "Cache write failed"),
            }
        } else {
            debug!(status = response.status, "Response not cacheable");
        }

        Ok(response)
    }

    async fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<CachedResponse, CacheError> {
        let response = self
            .http
            .get(url)
            .headers(headers.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(url = %url, status = status, "Fetched from network");

        Ok(CachedResponse {
            url: url.to_string(),
            status,
            headers: response_headers,
            body,
            created_at: self.clock.now(),
            expires_at: None,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use axum::{Router, http::StatusCode, routing::get};
    use reqwest::header::{AUTHORIZATION, HeaderValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Upstream {
        url: String,
        hits: Arc<AtomicUsize>,
    }

    async fn spawn_upstream(status: StatusCode) -> Upstream {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/data",
            get(move || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    (status, format!("[{n}]"))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Upstream {
            url: format!("http://{addr}/data"),
            hits,
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    async fn cached_client(dir: &tempfile::TempDir, clock: ManualClock) -> CachedHttpClient {
        client_with_ttl(dir, clock, Duration::from_secs(900)).await
    }

    async fn client_with_ttl(
        dir: &tempfile::TempDir,
        clock: ManualClock,
        ttl: Duration,
    ) -> CachedHttpClient {
        let config = CacheConfig::new(dir.path().join("cache.sqlite"), ttl);
        CachedHttpClient::open(reqwest::Client::new(), &config)
            .await
            .unwrap()
            .with_clock(Arc::new(clock))
    }

    #[tokio::test]
    async fn test_second_get_within_ttl_is_served_from_cache() {
        let upstream = spawn_upstream(StatusCode::OK).await;
        let dir = tempfile::tempdir().unwrap();
        let client = cached_client(&dir, ManualClock::default()).await;

        let first = client.get(&upstream.url, &bearer("t1")).await.unwrap();
        let second = client.get(&upstream.url, &bearer("t1")).await.unwrap();

        assert!(!first.from_cache);
        assert!(first.expires_at.is_some());
        assert!(second.from_cache);
        assert_eq!(second.text(), "[1]");
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_after_ttl_refetches() {
        let upstream = spawn_upstream(StatusCode::OK).await;
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::default();
        let client = cached_client(&dir, clock.clone()).await;

        client.get(&upstream.url, &bearer("t1")).await.unwrap();
        clock.advance(chrono::Duration::minutes(14));
        assert!(client.get(&upstream.url, &bearer("t1")).await.unwrap().from_cache);

        clock.advance(chrono::Duration::minutes(2));
        let refreshed = client.get(&upstream.url, &bearer("t1")).await.unwrap();

        assert!(!refreshed.from_cache);
        assert_eq!(refreshed.text(), "[2]");
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_different_tokens_do_not_share_entries() {
        let upstream = spawn_upstream(StatusCode::OK).await;
        let dir = tempfile::tempdir().unwrap();
        let client = cached_client(&dir, ManualClock::default()).await;

        client.get(&upstream.url, &bearer("t1")).await.unwrap();
        let other = client.get(&upstream.url, &bearer("t2")).await.unwrap();

        assert!(!other.from_cache);
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_responses_are_not_stored() {
        let upstream = spawn_upstream(StatusCode::SERVICE_UNAVAILABLE).await;
        let dir = tempfile::tempdir().unwrap();
        let client = cached_client(&dir, ManualClock::default()).await;

        let first = client.get(&upstream.url, &bearer("t1")).await.unwrap();
        let second = client.get(&upstream.url, &bearer("t1")).await.unwrap();

        assert_eq!(first.status, 503);
        assert!(first.expires_at.is_none());
        assert!(!second.from_cache);
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
        assert!(client.store().unwrap().is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_ttl_beyond_date_range_still_caches() {
        let upstream = spawn_upstream(StatusCode::OK).await;

        for ttl in [Duration::from_secs(9_000_000_000_000), Duration::from_secs(u64::MAX)] {
            let dir = tempfile::tempdir().unwrap();
            let client = client_with_ttl(&dir, ManualClock::default(), ttl).await;

            let first = client.get(&upstream.url, &HeaderMap::new()).await.unwrap();
            let second = client.get(&upstream.url, &HeaderMap::new()).await.unwrap();

            assert_eq!(first.expires_at, Some(DateTime::<Utc>::MAX_UTC));
            assert!(second.from_cache);
        }

        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_broken_store_falls_back_to_network() {
        let upstream = spawn_upstream(StatusCode::OK).await;
        let dir = tempfile::tempdir().unwrap();
        let client = cached_client(&dir, ManualClock::default()).await;

        let other = sqlx::SqlitePool::connect_with(
            sqlx::sqlite::SqliteConnectOptions::new().filename(dir.path().join("cache.sqlite")),
        )
        .await
        .unwrap();
        sqlx::query("DROP TABLE responses").execute(&other).await.unwrap();

        let first = client.get(&upstream.url, &bearer("t1")).await.unwrap();
        let second = client.get(&upstream.url, &bearer("t1")).await.unwrap();

        assert_eq!(first.status, 200);
        assert!(!second.from_cache);
        assert_eq!(second.text(), "[2]");
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_uncached_client_always_hits_network() {
        let upstream = spawn_upstream(StatusCode::OK).await;
        let client = CachedHttpClient::uncached(reqwest::Client::new());

        client.get(&upstream.url, &bearer("t1")).await.unwrap();
        let second = client.get(&upstream.url, &bearer("t1")).await.unwrap();

        assert!(!client.is_cached());
        assert!(!second.from_cache);
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_connection_failure_is_an_error() {
        let client = CachedHttpClient::uncached(reqwest::Client::new());
        let result = client.get("http://127.0.0.1:1/data", &HeaderMap::new()).await;
        assert!(matches!(result, Err(CacheError::Http(_))));
    }

    #[test]
    fn test_response_helpers() {
        let response = CachedResponse {
            url: "http://example.org".to_string(),
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: br#"{"a": 1}"#.to_vec(),
            created_at: Utc::now(),
            expires_at: None,
            from_cache: false,
        };

        assert!(response.is_success());
        assert_eq!(response.header("content-type"), Some("application/json"));
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["a"], 1);
    }
}
