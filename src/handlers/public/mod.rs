// handlers/public/mod.rs - Public handlers (no authentication required)

pub mod health; // GET /, GET /health

pub use health::{health_get, root_get};
