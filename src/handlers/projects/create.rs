use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Utc;
use tracing::info;

use super::json_body;
use crate::database::models::{NewProject, Project};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /project - create a project in the caller's organisation
pub async fn project_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> ApiResult<Project> {
    let input = json_body(payload)?;
    input.validate().map_err(ApiError::invalid_body)?;

    let project = state
        .projects
        .create(Project::create(user.organisation, input, Utc::now()))
        .await?;

    info!("{} ({}) created project {} ({})", user.name, user.id, project.name, project.id);
    Ok(ApiResponse::success(project))
}
