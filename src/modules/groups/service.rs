use dataporten_cache::{CacheError, CachedHttpClient};
use dataporten_models::{AccessToken, Group};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, instrument, warn};

/// Path of the "my groups" endpoint relative to the API base URL.
pub const GROUPS_PATH: &str = "/groups/me/groups";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Dataporten request failed: {0}")]
    Transport(#[from] CacheError),

    #[error("Dataporten answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed Dataporten response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Access token is not a valid header value")]
    InvalidToken,
}

/// Client for the Dataporten groups API.
///
/// Cheap to clone; every clone shares the same HTTP client and cache store.
#[derive(Clone, Debug)]
pub struct DataportenApi {
    http: CachedHttpClient,
    groups_url: String,
}

impl DataportenApi {
    pub fn new(http: CachedHttpClient, base_url: &str) -> Self {
        Self {
            http,
            groups_url: format!("{}{}", base_url.trim_end_matches('/'), GROUPS_PATH),
        }
    }

    pub fn groups_url(&self) -> &str {
        &self.groups_url
    }

    pub fn http(&self) -> &CachedHttpClient {
        &self.http
    }

    /// Fetches the group memberships of the token holder.
    ///
    /// # Errors
    ///
    /// - `ApiError::Transport` if the request could not be sent
    /// - `ApiError::Status` for any status other than 200
    /// - `ApiError::Parse` if the body is not a JSON array of groups
    #[instrument(skip(self, token))]
    pub async fn usergroups(&self, token: &AccessToken) -> Result<Vec<Group>, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&token.bearer()).map_err(|_| ApiError::InvalidToken)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let response = self.http.get(&self.groups_url, &headers).await?;

        if response.status != 200 {
            warn!(status = response.status, "Dataporten groups request failed");
            return Err(ApiError::Status {
                status: response.status,
                body: response.text(),
            });
        }

        let groups: Vec<Group> = response.json()?;

        debug!(
            groups = groups.len(),
            cache.hit = response.from_cache,
            "Fetched Dataporten groups"
        );

        Ok(groups)
    }
}
