use std::sync::Arc;

use tracing::info;

use super::renderer::RenderedReport;
use crate::mail::{MailError, MailSettings, Mailer, OutgoingEmail};

/// Addresses rendered reports with the configured sender and recipient and
/// hands them to a [`Mailer`].
#[derive(Clone)]
pub struct ReportDispatcher {
    mailer: Arc<dyn Mailer>,
    settings: MailSettings,
}

impl ReportDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, settings: MailSettings) -> Self {
        Self { mailer, settings }
    }

    pub async fn dispatch(&self, report: &RenderedReport) -> Result<(), MailError> {
        if self.settings.recipient.is_empty() {
            return Err(MailError::NotConfigured("REPORT_RECIPIENT"));
        }
        if self.settings.from_address.is_empty() {
            return Err(MailError::NotConfigured("MAIL_FROM_ADDRESS"));
        }

        let email = OutgoingEmail {
            from: self.settings.sender(),
            to: self.settings.recipient.clone(),
            subject: report.subject.clone(),
            html: report.html.clone(),
        };
        self.mailer.send(&email).await?;

        info!("Report '{}' sent to {}", email.subject, email.to);
        Ok(())
    }
}
