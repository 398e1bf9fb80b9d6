use axum::{
    extract::{Path, State},
    Extension,
};
use chrono::Utc;

use super::parse_project_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::report::ProjectReport;
use crate::state::AppState;

/// POST /project/:id/send-report - mail the last 30 days of activity
pub async fn send_report_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ProjectReport> {
    let id = parse_project_id(&id)?;
    let report = state.reports.send(user.organisation, id, Utc::now()).await?;
    Ok(ApiResponse::success(report).with_message("Report sent successfully!"))
}
