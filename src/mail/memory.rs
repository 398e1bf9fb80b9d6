// In-memory mailer.
//
// Records every message instead of sending it. Can be switched offline to
// exercise the relay-failure path.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MailError, Mailer, OutgoingEmail};

#[derive(Default)]
pub struct MemoryMailer {
    sent: RwLock<Vec<OutgoingEmail>>,
    offline: AtomicBool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(MailError::Rejected {
                status: 503,
                body: "Mail relay offline".to_string(),
            });
        }
        self.sent.write().await.push(email.clone());
        Ok(())
    }
}
