use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use super::{MailError, MailSettings, Mailer, OutgoingEmail};

/// Mailer that hands messages to an HTTP mail relay.
///
/// The relay receives `POST <relay_url>` with a JSON body
/// `{ from, to, subject, html }`, authenticated with basic auth from
/// [`MailSettings`]. Any non-2xx answer counts as a rejection.
pub struct HttpMailRelay {
    client: reqwest::Client,
    relay_url: String,
    username: String,
    password: String,
}

impl HttpMailRelay {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        if settings.relay_url.is_empty() {
            return Err(MailError::NotConfigured("MAIL_RELAY_URL"));
        }
        url::Url::parse(&settings.relay_url).map_err(|_| MailError::NotConfigured("MAIL_RELAY_URL"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            relay_url: settings.relay_url.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailRelay {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        debug!("Posting message for {} to mail relay {}", email.to, self.relay_url);

        let mut request = self.client.post(&self.relay_url).json(&json!({
            "from": email.from,
            "to": email.to,
            "subject": email.subject,
            "html": email.html,
        }));
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status: status.as_u16(), body });
        }

        info!("Mail relay accepted message '{}' for {}", email.subject, email.to);
        Ok(())
    }
}
