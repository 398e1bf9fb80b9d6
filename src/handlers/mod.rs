// handlers/mod.rs - Public and protected handler tiers
//
// Public (no auth) handlers answer / and /health.
// Protected handlers live under /project behind jwt_auth_middleware.

pub mod projects;
pub mod public;
