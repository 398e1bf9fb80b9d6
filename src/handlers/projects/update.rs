use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::Utc;

use super::{json_body, parse_project_id};
use crate::database::models::{Project, ProjectChanges};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// PUT /project/:id - partial update; `organisation` in the body is ignored
pub async fn project_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectChanges>, JsonRejection>,
) -> ApiResult<Project> {
    let id = parse_project_id(&id)?;
    let changes = json_body(payload)?;
    changes.validate().map_err(ApiError::invalid_body)?;

    let project = state
        .projects
        .update(user.organisation, id, &changes, Utc::now())
        .await?
        .ok_or_else(ApiError::project_not_found)?;
    Ok(ApiResponse::success(project))
}
