use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Activity, Project, ProjectChanges, User};
use crate::database::repository::Repository;
use crate::database::store::{ActivityStore, ProjectCriteria, ProjectStore, StoreError, UserDirectory};
use crate::filter::FilterData;

const PROJECT_RETURNING: &str = "RETURNING id, name, organisation, status, description, created_at, last_updated_at";

/// PostgreSQL-backed implementation of every store port.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn projects(&self) -> Repository<Project> {
        Repository::new(self.pool.clone())
    }

    fn activities(&self) -> Repository<Activity> {
        Repository::new(self.pool.clone())
    }

    fn users(&self) -> Repository<User> {
        Repository::new(self.pool.clone())
    }
}

#[async_trait]
impl ProjectStore for PostgresStore {
    async fn find(&self, criteria: &ProjectCriteria) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects().select_any(criteria.to_filter_data()).await?)
    }

    async fn find_by_id(&self, organisation: Uuid, id: Uuid) -> Result<Option<Project>, StoreError> {
        let filter = FilterData {
            where_clause: Some(json!({ "id": id, "organisation": organisation })),
            ..Default::default()
        };
        Ok(self.projects().select_one(filter).await?)
    }

    async fn create(&self, project: Project) -> Result<Project, StoreError> {
        let query = format!(
            "INSERT INTO projects (id, name, organisation, status, description, created_at, last_updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) {}",
            PROJECT_RETURNING
        );
        let created = sqlx::query_as::<_, Project>(&query)
            .bind(project.id)
            .bind(&project.name)
            .bind(project.organisation)
            .bind(&project.status)
            .bind(&project.description)
            .bind(project.created_at)
            .bind(project.last_updated_at)
            .fetch_one(&self.pool)
            .await?;

        debug!("Inserted project {} for organisation {}", created.id, created.organisation);
        Ok(created)
    }

    async fn update(
        &self,
        organisation: Uuid,
        id: Uuid,
        changes: &ProjectChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Project>, StoreError> {
        let query = format!(
            "UPDATE projects SET \
                name = COALESCE($1, name), \
                status = COALESCE($2, status), \
                description = COALESCE($3, description), \
                last_updated_at = $4 \
             WHERE id = $5 AND organisation = $6 {}",
            PROJECT_RETURNING
        );
        let updated = sqlx::query_as::<_, Project>(&query)
            .bind(changes.name.as_deref().map(str::trim))
            .bind(changes.status.as_deref())
            .bind(changes.description.as_deref())
            .bind(now)
            .bind(id)
            .bind(organisation)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, organisation: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND organisation = $2")
            .bind(id)
            .bind(organisation)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(DatabaseManager::health_check(&self.pool).await?)
    }
}

#[async_trait]
impl ActivityStore for PostgresStore {
    async fn find_since(&self, project_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Activity>, StoreError> {
        let filter = FilterData {
            where_clause: Some(json!({
                "project_id": project_id,
                "date": { "$gte": since.to_rfc3339() },
            })),
            order: Some(json!("date")),
        };
        Ok(self.activities().select_any(filter).await?)
    }
}

#[async_trait]
impl UserDirectory for PostgresStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let filter = FilterData {
            where_clause: Some(json!({ "id": id })),
            ..Default::default()
        };
        Ok(self.users().select_one(filter).await?)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        Ok(self.users().select_ids(ids).await?)
    }
}
