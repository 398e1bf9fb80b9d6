use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use super::json_body;
use crate::database::models::Project;
use crate::database::ProjectCriteria;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SearchBody {
    /// Empty strings count as absent.
    pub fn into_criteria(self, criteria: ProjectCriteria) -> ProjectCriteria {
        let mut criteria = criteria;
        if let Some(status) = self.status.filter(|s| !s.is_empty()) {
            criteria = criteria.with_status(status);
        }
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            criteria = criteria.with_name_containing(name);
        }
        criteria
    }
}

/// POST /project/search - name substring (case-insensitive) and exact status
///
/// A request without a JSON body searches with no filters.
pub async fn search_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResult<Vec<Project>> {
    let body = match payload {
        Err(JsonRejection::MissingJsonContentType(_)) => SearchBody::default(),
        payload => json_body(payload)?,
    };
    let criteria = body.into_criteria(ProjectCriteria::for_organisation(user.organisation));
    let projects = state.projects.find(&criteria).await?;
    Ok(ApiResponse::success(projects))
}
