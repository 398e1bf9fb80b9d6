// Project activity report.
//
// Aggregates the last REPORT_WINDOW_DAYS of activities for a project, renders
// them as HTML and mails the result. One project lookup, one activity range
// query, one batch user lookup and one send per request.

pub mod aggregator;
pub mod dispatcher;
pub mod renderer;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::{ActivityStore, ProjectStore, StoreError, UserDirectory};
use crate::mail::MailError;

pub use aggregator::{aggregate, ActivitySummary};
pub use dispatcher::ReportDispatcher;
pub use renderer::{render, RenderedReport};

pub const REPORT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("project {0} not found")]
    ProjectNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// What a sent report covered, returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project_id: Uuid,
    pub project_name: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub activity_count: usize,
    pub total_hours: Decimal,
    pub total_budget: Decimal,
    pub contributors: usize,
    pub subject: String,
}

#[derive(Clone)]
pub struct ReportPipeline {
    projects: Arc<dyn ProjectStore>,
    activities: Arc<dyn ActivityStore>,
    users: Arc<dyn UserDirectory>,
    dispatcher: ReportDispatcher,
}

impl ReportPipeline {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        activities: Arc<dyn ActivityStore>,
        users: Arc<dyn UserDirectory>,
        dispatcher: ReportDispatcher,
    ) -> Self {
        Self {
            projects,
            activities,
            users,
            dispatcher,
        }
    }

    /// Build and send the report for `project_id` covering the window ending at `now`.
    pub async fn send(&self, organisation: Uuid, project_id: Uuid, now: DateTime<Utc>) -> Result<ProjectReport, ReportError> {
        let project = self
            .projects
            .find_by_id(organisation, project_id)
            .await?
            .ok_or(ReportError::ProjectNotFound(project_id))?;

        let since = now - Duration::days(REPORT_WINDOW_DAYS);
        let activities = self.activities.find_since(project.id, since).await?;
        debug!("Report for {} covers {} activities since {}", project.id, activities.len(), since);

        let summary = aggregate(&activities);
        let users = if summary.hours_by_user.is_empty() {
            Vec::new()
        } else {
            self.users.find_by_ids(&summary.contributor_ids()).await?
        };

        let rendered = render(&project.name, &summary, &users);
        self.dispatcher.dispatch(&rendered).await?;
        info!("Sent report for project {} ({})", project.name, project.id);

        Ok(ProjectReport {
            project_id: project.id,
            project_name: project.name,
            window_start: since,
            window_end: now,
            activity_count: activities.len(),
            total_hours: summary.total_hours,
            total_budget: summary.total_budget,
            contributors: summary.hours_by_user.len(),
            subject: rendered.subject,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Activity, NewProject, Project, User};
    use crate::database::InMemoryStore;
    use crate::mail::{MailSettings, MemoryMailer};

    struct Fixture {
        store: Arc<InMemoryStore>,
        mailer: Arc<MemoryMailer>,
        pipeline: ReportPipeline,
        organisation: Uuid,
        project: Project,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(MemoryMailer::new());
        let mut settings = MailSettings::unconfigured(5);
        settings.from_address = "reports@example.com".to_string();
        settings.recipient = "manager@example.com".to_string();

        let organisation = Uuid::new_v4();
        let project = store
            .create(Project::create(
                organisation,
                NewProject {
                    name: "Apollo".to_string(),
                    status: None,
                    description: None,
                },
                Utc::now(),
            ))
            .await
            .unwrap();

        let pipeline = ReportPipeline::new(
            store.clone(),
            store.clone(),
            store.clone(),
            ReportDispatcher::new(mailer.clone(), settings),
        );
        Fixture {
            store,
            mailer,
            pipeline,
            organisation,
            project,
        }
    }

    async fn log(store: &InMemoryStore, project_id: Uuid, user_id: Uuid, date: DateTime<Utc>, hours: i64) {
        store
            .add_activity(Activity {
                id: Uuid::new_v4(),
                project_id,
                user_id,
                date,
                total: Decimal::from(hours),
                value: Decimal::from(hours * 50),
            })
            .await;
    }

    #[tokio::test]
    async fn unknown_project_fails_before_sending() {
        let f = fixture().await;
        let missing = Uuid::new_v4();
        let err = f.pipeline.send(f.organisation, missing, Utc::now()).await.unwrap_err();
        assert!(matches!(err, ReportError::ProjectNotFound(id) if id == missing));
        assert!(f.mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn project_of_another_organisation_is_not_found() {
        let f = fixture().await;
        let err = f.pipeline.send(Uuid::new_v4(), f.project.id, Utc::now()).await.unwrap_err();
        assert!(matches!(err, ReportError::ProjectNotFound(_)));
    }

    #[tokio::test]
    async fn only_activities_inside_window_are_counted() {
        let f = fixture().await;
        let now = Utc::now();
        let alice = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            organisation: f.organisation,
        };
        f.store.add_user(alice.clone()).await;

        log(&f.store, f.project.id, alice.id, now - Duration::days(2), 3).await;
        log(&f.store, f.project.id, alice.id, now - Duration::days(REPORT_WINDOW_DAYS), 4).await;
        log(&f.store, f.project.id, alice.id, now - Duration::days(REPORT_WINDOW_DAYS + 1), 100).await;
        log(&f.store, Uuid::new_v4(), alice.id, now, 100).await;

        let report = f.pipeline.send(f.organisation, f.project.id, now).await.unwrap();
        assert_eq!(report.activity_count, 2);
        assert_eq!(report.total_hours, Decimal::from(7));
        assert_eq!(report.total_budget, Decimal::from(350));
        assert_eq!(report.contributors, 1);

        let sent = f.mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Report for Project: Apollo");
        assert!(sent[0].html.contains("<li>Alice: 7.00 hrs</li>"));
    }

    #[tokio::test]
    async fn empty_window_still_sends() {
        let f = fixture().await;
        let report = f.pipeline.send(f.organisation, f.project.id, Utc::now()).await.unwrap();
        assert_eq!(report.activity_count, 0);
        assert_eq!(report.total_hours, Decimal::ZERO);

        let sent = f.mailer.sent().await;
        assert!(sent[0].html.contains("0.00 hrs"));
    }

    #[tokio::test]
    async fn mail_failure_is_reported() {
        let f = fixture().await;
        f.mailer.set_offline(true);
        let err = f.pipeline.send(f.organisation, f.project.id, Utc::now()).await.unwrap_err();
        assert!(matches!(err, ReportError::Mail(_)));
    }
}
