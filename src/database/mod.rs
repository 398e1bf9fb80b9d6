pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{ActivityStore, ProjectCriteria, ProjectStore, StoreError, UserDirectory};
