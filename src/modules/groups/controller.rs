use axum::Json;
use dataporten_core::AppError;
use dataporten_models::{Group, course_code};
use serde::Serialize;
use tracing::instrument;

use crate::modules::users::model::{DataportenUser, RequestUser};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub kind: &'static str,
    pub username: Option<String>,
    pub dataporten: bool,
}

#[derive(Debug, Serialize)]
pub struct GroupsResponse {
    pub groups: Vec<Group>,
    pub courses: Vec<String>,
}

/// Who is making the request, and whether group data is available.
#[instrument(skip(user), fields(user.kind = user.kind()))]
pub async fn get_me(user: RequestUser) -> Json<MeResponse> {
    Json(MeResponse {
        kind: user.kind(),
        username: user.user().map(|u| u.username.clone()),
        dataporten: user.dataporten().is_some(),
    })
}

/// Group memberships of a user with a linked Dataporten account.
#[instrument(skip(user), fields(user = %user.user().username))]
pub async fn get_my_groups(user: DataportenUser) -> Result<Json<GroupsResponse>, AppError> {
    let groups = user.groups().await.map_err(AppError::bad_gateway)?;
    let courses = groups
        .iter()
        .filter_map(course_code)
        .map(str::to_string)
        .collect();

    Ok(Json(GroupsResponse { groups, courses }))
}
