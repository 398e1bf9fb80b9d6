//! Outbound mail.
//!
//! The report pipeline talks to a [`Mailer`]; production wires in
//! [`HttpMailRelay`], tests use [`MemoryMailer`].

pub mod memory;
pub mod relay;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryMailer;
pub use relay::HttpMailRelay;

/// Account and routing settings for outbound report mail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    /// Relay endpoint that accepts JSON messages.
    pub relay_url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub from_address: String,
    pub from_name: String,
    /// Fixed report recipient.
    pub recipient: String,
    pub timeout_secs: u64,
}

impl MailSettings {
    pub fn unconfigured(timeout_secs: u64) -> Self {
        Self {
            relay_url: String::new(),
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            from_name: "Your Platform".to_string(),
            recipient: String::new(),
            timeout_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.relay_url.is_empty() && !self.from_address.is_empty() && !self.recipient.is_empty()
    }

    /// `"Name" <address>` form used for the From header.
    pub fn sender(&self) -> String {
        if self.from_name.is_empty() {
            self.from_address.clone()
        } else {
            format!("\"{}\" <{}>", self.from_name, self.from_address)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("mail relay unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}
