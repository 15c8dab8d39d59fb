use crate::modules::groups::controller::{get_me, get_my_groups};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_groups_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/groups", get(get_my_groups))
}
