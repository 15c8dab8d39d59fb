//! Minimal host authentication for the example binary.
//!
//! Trusts the `X-Remote-User` header set by a fronting proxy and turns it into
//! a [`RequestUser::Authenticated`]. Requests without the header are anonymous.

use axum::{extract::Request, http::HeaderName, middleware::Next, response::Response};
use dataporten_models::User;
use uuid::Uuid;

use crate::modules::users::model::RequestUser;

pub const REMOTE_USER: HeaderName = HeaderName::from_static("x-remote-user");

pub async fn remote_user(mut req: Request, next: Next) -> Response {
    let user = req
        .headers()
        .get(REMOTE_USER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let mut user = User::new(name);
            // Same username, same id
            user.id = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes());
            RequestUser::Authenticated(user)
        })
        .unwrap_or_default();

    req.extensions_mut().insert(user);
    next.run(req).await
}
