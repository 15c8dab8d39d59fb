use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Response, StatusCode, header};
use axum::{Router, routing::get};
use dataporten::modules::users::tokens::TokenResolver;
use dataporten::{AppState, DataportenApi};
use dataporten_cache::{CacheConfig, CachedHttpClient, ManualClock};
use dataporten_config::DataportenConfig;
use http_body_util::BodyExt;

#[allow(dead_code)]
pub const GROUPS_JSON: &str = r#"[
    {
        "id": "fc:org:ntnu.no",
        "displayName": "NTNU",
        "type": "fc:org",
        "membership": { "basic": "member", "primaryAffiliation": "student" }
    },
    {
        "id": "fc:fs:fs:emne:ntnu.no:TMA4100:1",
        "displayName": "Matematikk 1",
        "type": "fc:fs:emne",
        "parent": "fc:org:ntnu.no",
        "membership": { "basic": "member", "active": true, "fsroles": ["STUDENT"] }
    },
    {
        "id": "fc:adhoc:1234",
        "displayName": "Kollokviegruppe",
        "type": "fc:adhoc"
    }
]"#;

/// In-process stand-in for groups-api.dataporten.no.
#[allow(dead_code)]
pub struct MockDataporten {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    tokens: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockDataporten {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Bearer tokens seen, in request order.
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

/// Serves `body` with `status` on `/groups/me/groups`.
///
/// Requests without a bearer token get 401 and are not counted.
#[allow(dead_code)]
pub async fn spawn_dataporten(status: StatusCode, body: &'static str) -> MockDataporten {
    let hits = Arc::new(AtomicUsize::new(0));
    let tokens = Arc::new(Mutex::new(Vec::new()));

    let (hits_handle, tokens_handle) = (hits.clone(), tokens.clone());
    let app = Router::new().route(
        "/groups/me/groups",
        get(move |headers: HeaderMap| {
            let hits = hits_handle.clone();
            let tokens = tokens_handle.clone();
            async move {
                let token = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.strip_prefix("Bearer "))
                    .map(str::to_string);

                let Some(token) = token else {
                    return Response::builder()
                        .status(StatusCode::UNAUTHORIZED)
                        .body(Body::empty())
                        .unwrap();
                };

                hits.fetch_add(1, Ordering::SeqCst);
                tokens.lock().unwrap().push(token);

                Response::builder()
                    .status(status)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap()
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockDataporten {
        base_url: format!("http://{addr}"),
        hits,
        tokens,
    }
}

/// API client caching into `dir` with a controllable clock.
#[allow(dead_code)]
pub async fn cached_api(
    base_url: &str,
    dir: &tempfile::TempDir,
    clock: ManualClock,
) -> DataportenApi {
    let config = CacheConfig::new(
        dir.path().join("dataporten_cache.sqlite"),
        Duration::from_secs(900),
    );
    let http = CachedHttpClient::open(reqwest::Client::new(), &config)
        .await
        .unwrap()
        .with_clock(Arc::new(clock));

    DataportenApi::new(http, base_url)
}

#[allow(dead_code)]
pub fn uncached_api(base_url: &str) -> DataportenApi {
    DataportenApi::new(CachedHttpClient::uncached(reqwest::Client::new()), base_url)
}

#[allow(dead_code)]
pub fn test_state(api: DataportenApi, tokens: Arc<dyn TokenResolver>) -> AppState {
    let config = DataportenConfig {
        cache_requests: api.http().is_cached(),
        ..DataportenConfig::default()
    };
    AppState::new(config, api, tokens)
}

#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
