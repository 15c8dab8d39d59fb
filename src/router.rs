use crate::logging::logging_middleware;
use crate::middleware::groups::dataporten_groups;
use crate::middleware::remote_user::remote_user;
use crate::modules::groups::router::init_groups_router;
use crate::state::AppState;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

/// Router of the example host.
///
/// Layers run bottom-up: request logging, remote-user authentication, then
/// the Dataporten classifier.
pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(init_groups_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            dataporten_groups,
        ))
        .layer(middleware::from_fn(remote_user))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
