pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod report;
pub mod server;
pub mod state;

pub use server::app;
pub use state::AppState;
