// In-memory implementation of the store ports.
//
// Keeps rows in insertion order and enforces the same (organisation, name)
// uniqueness as the projects table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Activity, Project, ProjectChanges, User};
use crate::database::store::{ActivityStore, ProjectCriteria, ProjectStore, StoreError, UserDirectory};

const UNIQUE_NAME: &str = "projects_organisation_name_key";

#[derive(Default)]
pub struct InMemoryStore {
    projects: RwLock<Vec<Project>>,
    activities: RwLock<Vec<Activity>>,
    users: RwLock<Vec<User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.push(user);
    }

    pub async fn add_activity(&self, activity: Activity) {
        self.activities.write().await.push(activity);
    }

    pub async fn project_count(&self) -> usize {
        self.projects.read().await.len()
    }
}

fn name_taken(projects: &[Project], organisation: Uuid, name: &str, except: Option<Uuid>) -> bool {
    projects
        .iter()
        .any(|p| p.organisation == organisation && p.name == name && Some(p.id) != except)
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn find(&self, criteria: &ProjectCriteria) -> Result<Vec<Project>, StoreError> {
        let guard = self.projects.read().await;
        let mut items: Vec<Project> = guard.iter().filter(|p| criteria.matches(p)).cloned().collect();
        items.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at));
        Ok(items)
    }

    async fn find_by_id(&self, organisation: Uuid, id: Uuid) -> Result<Option<Project>, StoreError> {
        let guard = self.projects.read().await;
        Ok(guard
            .iter()
            .find(|p| p.id == id && p.organisation == organisation)
            .cloned())
    }

    async fn create(&self, project: Project) -> Result<Project, StoreError> {
        let mut guard = self.projects.write().await;
        if name_taken(&guard, project.organisation, &project.name, None) {
            return Err(StoreError::Conflict(UNIQUE_NAME.to_string()));
        }
        guard.push(project.clone());
        Ok(project)
    }

    async fn update(
        &self,
        organisation: Uuid,
        id: Uuid,
        changes: &ProjectChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Project>, StoreError> {
        let mut guard = self.projects.write().await;
        let Some(index) = guard.iter().position(|p| p.id == id && p.organisation == organisation) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            if name_taken(&guard, organisation, name.trim(), Some(id)) {
                return Err(StoreError::Conflict(UNIQUE_NAME.to_string()));
            }
        }
        let project = &mut guard[index];
        project.apply(changes, now);
        Ok(Some(project.clone()))
    }

    async fn delete(&self, organisation: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut guard = self.projects.write().await;
        let before = guard.len();
        guard.retain(|p| !(p.id == id && p.organisation == organisation));
        Ok(guard.len() < before)
    }
}

#[async_trait]
impl ActivityStore for InMemoryStore {
    async fn find_since(&self, project_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Activity>, StoreError> {
        let guard = self.activities.read().await;
        Ok(guard
            .iter()
            .filter(|a| a.project_id == project_id && a.date >= since)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        let guard = self.users.read().await;
        Ok(guard.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }
}
