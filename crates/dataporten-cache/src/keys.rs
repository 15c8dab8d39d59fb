//! Cache key generation.
//!
//! A key is the hex SHA-256 digest of the request method, the normalised URL
//! and, optionally, the request headers.

use reqwest::{Url, header::HeaderMap};
use sha2::{Digest, Sha256};

/// Builds the cache key for a request.
///
/// Query parameters are sorted and fragments dropped before hashing. Headers
/// are sorted by name, so insertion order never changes the key.
pub fn request_key(method: &str, url: &str, headers: Option<&HeaderMap>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(normalize_url(url).as_bytes());
    hasher.update(b"\n");

    if let Some(headers) = headers {
        let mut pairs: Vec<(&str, &[u8])> = headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_bytes()))
            .collect();
        pairs.sort();

        for (name, value) in pairs {
            hasher.update(name.as_bytes());
            hasher.update(b":");
            hasher.update(value);
            hasher.update(b"\n");
        }
    }

    hex::encode(hasher.finalize())
}

fn normalize_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let mut pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    if pairs.is_empty() {
        parsed.set_query(None);
    } else {
        pairs.sort();
        parsed.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
    parsed.set_fragment(None);

    parsed.to_string()
}
