use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Table;
use crate::filter::{ColumnDef, PgType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub organisation: Uuid,
}

impl Table for User {
    const TABLE_NAME: &'static str = "users";
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", PgType::Uuid),
        ColumnDef::new("name", PgType::Text),
        ColumnDef::new("email", PgType::Text),
        ColumnDef::new("organisation", PgType::Uuid),
    ];
}
