//! Request classifier attaching Dataporten group lookup to linked users.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{debug, warn};

use crate::modules::users::model::{DataportenUser, RequestUser};
use crate::state::AppState;

/// Upgrades an authenticated user with a valid linked token to
/// [`RequestUser::Dataporten`].
///
/// Anonymous users, users without a token and users whose token has expired
/// pass through untouched. Resolver failures are logged and treated as "no
/// token". Nothing is fetched from Dataporten here.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use dataporten::middleware::groups::dataporten_groups;
///
/// let app = Router::new()
///     .route("/me/groups", get(my_groups))
///     .layer(middleware::from_fn_with_state(state.clone(), dataporten_groups))
///     .layer(middleware::from_fn(host_authentication));
/// ```
pub async fn dataporten_groups(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(upgraded) = classify(&state, req.extensions().get::<RequestUser>()).await {
        req.extensions_mut().insert(upgraded);
    }

    next.run(req).await
}

async fn classify(state: &AppState, current: Option<&RequestUser>) -> Option<RequestUser> {
    let Some(RequestUser::Authenticated(user)) = current else {
        return None;
    };

    let token = match state.tokens.resolve(user).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            debug!(user = %user.username, "No linked Dataporten token");
            return None;
        }
        Err(e) => {
            warn!(user = %user.username, error = %e, "Failed to resolve Dataporten token");
            return None;
        }
    };

    if !token.is_valid_at(Utc::now()) {
        debug!(user = %user.username, "Linked Dataporten token is not valid");
        return None;
    }

    debug!(user = %user.username, "Attached Dataporten groups to user");

    Some(RequestUser::Dataporten(DataportenUser::new(
        user.clone(),
        token,
        state.api.clone(),
    )))
}
