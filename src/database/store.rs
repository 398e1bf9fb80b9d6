// Store ports.
//
// Handlers and the report pipeline code against these traits. `PostgresStore`
// implements them for production, `InMemoryStore` for tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Activity, Project, ProjectChanges, Table, User};
use crate::filter::{escape_like, FilterData, FilterError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.constraint().unwrap_or("unique key").to_string())
            }
            _ => StoreError::Database(DatabaseError::Sqlx(err)),
        }
    }
}

/// Which projects to return. Always scoped to one organisation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCriteria {
    pub organisation: Uuid,
    /// Exact matches on project columns, compared as text.
    pub equals: BTreeMap<String, String>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
}

impl ProjectCriteria {
    pub fn for_organisation(organisation: Uuid) -> Self {
        Self {
            organisation,
            equals: BTreeMap::new(),
            name_contains: None,
        }
    }

    /// Build criteria from list query parameters. Any `organisation` parameter
    /// is ignored in favour of the caller's.
    pub fn from_query(organisation: Uuid, params: HashMap<String, String>) -> Result<Self, FilterError> {
        let mut criteria = Self::for_organisation(organisation);
        for (key, value) in params {
            if key == "organisation" {
                continue;
            }
            let Some(column) = Project::COLUMNS.iter().find(|c| c.name == key) else {
                return Err(FilterError::InvalidColumn(key));
            };
            if !column.pg_type.accepts(&value) {
                return Err(FilterError::InvalidValue { column: key, value });
            }
            criteria.equals.insert(key, value);
        }
        Ok(criteria)
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.equals.insert("status".to_string(), status.into());
        self
    }

    pub fn with_name_containing(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Filter document for the SQL store, newest first.
    pub fn to_filter_data(&self) -> FilterData {
        let mut conditions = Map::new();
        for (column, value) in &self.equals {
            conditions.insert(column.clone(), Value::String(value.clone()));
        }
        if let Some(fragment) = &self.name_contains {
            conditions.insert(
                "name".to_string(),
                json!({ "$ilike": format!("%{}%", escape_like(fragment)) }),
            );
        }
        conditions.insert("organisation".to_string(), Value::String(self.organisation.to_string()));

        FilterData {
            where_clause: Some(Value::Object(conditions)),
            order: Some(json!("-last_updated_at")),
        }
    }

    /// Same predicate as [`Self::to_filter_data`], evaluated in memory.
    pub fn matches(&self, project: &Project) -> bool {
        if project.organisation != self.organisation {
            return false;
        }
        if let Some(fragment) = &self.name_contains {
            if !project.name.to_lowercase().contains(&fragment.to_lowercase()) {
                return false;
            }
        }
        if self.equals.is_empty() {
            return true;
        }
        let row = match serde_json::to_value(project) {
            Ok(Value::Object(row)) => row,
            _ => return false,
        };
        self.equals.iter().all(|(column, expected)| match row.get(column) {
            Some(Value::String(actual)) => actual == expected,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == *expected,
        })
    }
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Matching projects, most recently updated first.
    async fn find(&self, criteria: &ProjectCriteria) -> Result<Vec<Project>, StoreError>;

    async fn find_by_id(&self, organisation: Uuid, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the organisation already has a project with that name.
    async fn create(&self, project: Project) -> Result<Project, StoreError>;

    async fn update(
        &self,
        organisation: Uuid,
        id: Uuid,
        changes: &ProjectChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Project>, StoreError>;

    /// Returns whether a project was removed.
    async fn delete(&self, organisation: Uuid, id: Uuid) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Activities of `project_id` dated at or after `since`.
    async fn find_since(&self, project_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Activity>, StoreError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError>;
}
