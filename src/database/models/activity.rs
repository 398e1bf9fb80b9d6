use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Table;
use crate::filter::{ColumnDef, PgType};

/// Work recorded against a project: `total` hours worth `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub total: Decimal,
    pub value: Decimal,
}

impl Table for Activity {
    const TABLE_NAME: &'static str = "activities";
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", PgType::Uuid),
        ColumnDef::new("project_id", PgType::Uuid),
        ColumnDef::new("user_id", PgType::Uuid),
        ColumnDef::new("date", PgType::Timestamptz),
        ColumnDef::new("total", PgType::Numeric),
        ColumnDef::new("value", PgType::Numeric),
    ];
}
