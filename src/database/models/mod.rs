pub mod activity;
pub mod project;
pub mod user;

pub use activity::Activity;
pub use project::{NewProject, Project, ProjectChanges};
pub use user::User;

use crate::filter::ColumnDef;

/// A row type backed by one table with a fixed, typed column list.
pub trait Table {
    const TABLE_NAME: &'static str;
    const COLUMNS: &'static [ColumnDef];

    fn has_column(name: &str) -> bool {
        Self::COLUMNS.iter().any(|c| c.name == name)
    }
}
