use axum::{
    extract::{Path, State},
    Extension,
};

use super::parse_project_id;
use crate::database::models::Project;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /project/:id - show one project
pub async fn project_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Project> {
    let id = parse_project_id(&id)?;
    let project = state
        .projects
        .find_by_id(user.organisation, id)
        .await?
        .ok_or_else(ApiError::project_not_found)?;
    Ok(ApiResponse::success(project))
}
