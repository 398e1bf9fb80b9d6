use axum::{
    extract::{Path, State},
    Extension,
};
use tracing::info;

use super::parse_project_id;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// DELETE /project/:id
pub async fn project_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_project_id(&id)?;
    if !state.projects.delete(user.organisation, id).await? {
        return Err(ApiError::project_not_found());
    }

    info!("User {} deleted project {}", user.id, id);
    Ok(ApiResponse::ok())
}
