use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    ILike,
    In,
}

/// Raw filter request: a JSON WHERE document plus an ORDER spec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    #[serde(rename = "where")]
    pub where_clause: Option<serde_json::Value>,
    pub order: Option<serde_json::Value>,
}

/// PostgreSQL column types the filter knows how to cast parameters to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgType {
    Uuid,
    Text,
    Numeric,
    Timestamptz,
}

impl PgType {
    pub fn cast(&self) -> &'static str {
        match self {
            PgType::Uuid => "uuid",
            PgType::Text => "text",
            PgType::Numeric => "numeric",
            PgType::Timestamptz => "timestamptz",
        }
    }

    /// Whether `raw` survives the cast to this type.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            PgType::Uuid => uuid::Uuid::parse_str(raw).is_ok(),
            PgType::Text => true,
            PgType::Numeric => raw.parse::<rust_decimal::Decimal>().is_ok(),
            PgType::Timestamptz => chrono::DateTime::parse_from_rfc3339(raw).is_ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub pg_type: PgType,
}

impl ColumnDef {
    pub const fn new(name: &'static str, pg_type: PgType) -> Self {
        Self { name, pg_type }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<serde_json::Value>,
}
