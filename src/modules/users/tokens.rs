//! Token resolution seam.
//!
//! Linked OAuth tokens live in the host application's storage. The host hands
//! the middleware a [`TokenResolver`] that knows how to find them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use dataporten_models::{AccessToken, User};

#[async_trait]
pub trait TokenResolver: Send + Sync {
    /// Returns the user's linked Dataporten token, if any.
    ///
    /// Validity is checked by the caller; resolvers may return expired tokens.
    async fn resolve(&self, user: &User) -> anyhow::Result<Option<AccessToken>>;
}

/// Token store keyed by username.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, AccessToken>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, username: impl Into<String>, token: AccessToken) {
        self.tokens
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(username.into(), token);
    }

    pub fn remove(&self, username: &str) -> Option<AccessToken> {
        self.tokens
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(username)
    }

    pub fn len(&self) -> usize {
        self.tokens.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<U, T> FromIterator<(U, T)> for InMemoryTokenStore
where
    U: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (U, T)>>(iter: I) -> Self {
        let store = Self::new();
        for (username, token) in iter {
            store.insert(username, AccessToken::new(token));
        }
        store
    }
}

#[async_trait]
impl TokenResolver for InMemoryTokenStore {
    async fn resolve(&self, user: &User) -> anyhow::Result<Option<AccessToken>> {
        Ok(self
            .tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&user.username)
            .cloned())
    }
}
