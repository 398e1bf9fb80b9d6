use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Extension,
};

use crate::database::models::Project;
use crate::database::ProjectCriteria;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /project - list the caller's projects, newest first.
///
/// Query parameters are exact-match filters on project columns.
pub async fn project_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Project>> {
    let criteria = ProjectCriteria::from_query(user.organisation, params)?;
    let projects = state.projects.find(&criteria).await?;
    Ok(ApiResponse::success(projects))
}
