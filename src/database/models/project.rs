use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Table;
use crate::filter::{ColumnDef, PgType};

pub const DEFAULT_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub organisation: Uuid,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl Table for Project {
    const TABLE_NAME: &'static str = "projects";
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::new("id", PgType::Uuid),
        ColumnDef::new("name", PgType::Text),
        ColumnDef::new("organisation", PgType::Uuid),
        ColumnDef::new("status", PgType::Text),
        ColumnDef::new("description", PgType::Text),
        ColumnDef::new("created_at", PgType::Timestamptz),
        ColumnDef::new("last_updated_at", PgType::Timestamptz),
    ];
}

impl Project {
    /// Build a fresh project owned by `organisation`.
    pub fn create(organisation: Uuid, input: NewProject, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            organisation,
            status: input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            description: input.description,
            created_at: now,
            last_updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: &ProjectChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(status) = &changes.status {
            self.status = status.clone();
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        self.last_updated_at = now;
    }
}

/// Body of `POST /project`. The organisation always comes from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProject {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Project name is required".to_string());
        }
        if matches!(&self.status, Some(s) if s.trim().is_empty()) {
            return Err("Project status cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Body of `PUT /project/:id`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectChanges {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err("Project name cannot be empty".to_string());
        }
        if matches!(&self.status, Some(s) if s.trim().is_empty()) {
            return Err("Project status cannot be empty".to_string());
        }
        Ok(())
    }
}
