use std::sync::Arc;

use crate::database::{ActivityStore, InMemoryStore, PostgresStore, ProjectStore, UserDirectory};
use crate::mail::{MailSettings, Mailer};
use crate::middleware::AuthSettings;
use crate::report::{ReportDispatcher, ReportPipeline};

/// Shared handler state; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn ProjectStore>,
    pub users: Arc<dyn UserDirectory>,
    pub reports: Arc<ReportPipeline>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        activities: Arc<dyn ActivityStore>,
        users: Arc<dyn UserDirectory>,
        mailer: Arc<dyn Mailer>,
        mail: MailSettings,
        auth: AuthSettings,
    ) -> Self {
        let dispatcher = ReportDispatcher::new(mailer, mail);
        let reports = ReportPipeline::new(projects.clone(), activities, users.clone(), dispatcher);
        Self {
            projects,
            users,
            reports: Arc::new(reports),
            auth,
        }
    }

    /// All stores backed by one PostgreSQL pool.
    pub fn postgres(store: PostgresStore, mailer: Arc<dyn Mailer>, mail: MailSettings, auth: AuthSettings) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, mailer, mail, auth)
    }

    /// All stores backed by one in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>, mailer: Arc<dyn Mailer>, mail: MailSettings, auth: AuthSettings) -> Self {
        Self::new(store.clone(), store.clone(), store, mailer, mail, auth)
    }
}
