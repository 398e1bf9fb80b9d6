// handlers/projects/mod.rs - Project resource handlers, mounted at /project
//
// Every handler runs behind jwt_auth_middleware and reads the caller from
// the AuthUser extension. Lookups are scoped to the caller's organisation.

use axum::{extract::rejection::JsonRejection, Json};
use uuid::Uuid;

use crate::error::ApiError;

pub mod create;   // POST   /project
pub mod delete;   // DELETE /project/:id
pub mod list;     // GET    /project, /project/list
pub mod report;   // POST   /project/:id/send-report
pub mod search;   // POST   /project/search
pub mod show;     // GET    /project/:id
pub mod update;   // PUT    /project/:id

pub use create::project_post;
pub use delete::project_delete;
pub use list::project_list;
pub use report::send_report_post;
pub use search::search_post;
pub use show::project_get;
pub use update::project_put;

/// A malformed id cannot name an existing project.
pub(crate) fn parse_project_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::project_not_found())
}

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))
}
