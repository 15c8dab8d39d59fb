//! Per-request user variants.
//!
//! The host's authentication layer inserts a [`RequestUser`] into the request
//! extensions. The groups middleware may then upgrade an authenticated user to
//! [`RequestUser::Dataporten`], which carries the linked token and can look up
//! group memberships on demand.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use dataporten_core::AppError;
use dataporten_models::{AccessToken, Group, User};

use crate::modules::groups::service::{ApiError, DataportenApi};

#[derive(Debug, Clone, Default)]
pub enum RequestUser {
    #[default]
    Anonymous,
    Authenticated(User),
    Dataporten(DataportenUser),
}

impl RequestUser {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, RequestUser::Anonymous)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            RequestUser::Anonymous => None,
            RequestUser::Authenticated(user) => Some(user),
            RequestUser::Dataporten(dp) => Some(dp.user()),
        }
    }

    /// Group lookup capability, present only for upgraded users.
    pub fn dataporten(&self) -> Option<&DataportenUser> {
        match self {
            RequestUser::Dataporten(dp) => Some(dp),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RequestUser::Anonymous => "anonymous",
            RequestUser::Authenticated(_) => "user",
            RequestUser::Dataporten(_) => "dataporten",
        }
    }
}

impl<S> FromRequestParts<S> for RequestUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestUser>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Authenticated user with a valid linked Dataporten token.
///
/// Group memberships are fetched when asked for, never up front.
#[derive(Debug, Clone)]
pub struct DataportenUser {
    user: User,
    token: AccessToken,
    api: DataportenApi,
}

impl DataportenUser {
    pub fn new(user: User, token: AccessToken, api: DataportenApi) -> Self {
        Self { user, token, api }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn into_user(self) -> User {
        self.user
    }

    pub async fn groups(&self) -> Result<Vec<Group>, ApiError> {
        self.api.usergroups(&self.token).await
    }

    pub async fn courses(&self) -> Result<Vec<Group>, ApiError> {
        Ok(self
            .groups()
            .await?
            .into_iter()
            .filter(Group::is_course)
            .collect())
    }

    pub async fn is_member_of(&self, group_id: &str) -> Result<bool, ApiError> {
        Ok(self.groups().await?.iter().any(|g| g.id == group_id))
    }
}

impl AsRef<User> for DataportenUser {
    fn as_ref(&self) -> &User {
        &self.user
    }
}

impl<S> FromRequestParts<S> for DataportenUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestUser>() {
            Some(RequestUser::Dataporten(dp)) => Ok(dp.clone()),
            Some(RequestUser::Authenticated(_)) => Err(AppError::forbidden(
                "No linked Dataporten account for this user",
            )),
            _ => Err(AppError::unauthorized("Authentication required")),
        }
    }
}
