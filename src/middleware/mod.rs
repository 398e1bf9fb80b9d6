pub mod auth;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthSettings, AuthUser};
pub use response::{ApiResponse, ApiResult};
