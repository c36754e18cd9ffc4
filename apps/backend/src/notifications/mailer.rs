use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

use crate::config::email::{EmailConfig, EmailMode};
use crate::logging::pii::Redacted;

/// A fully composed plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport rejected message: {0}")]
    Transport(String),
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// Delivery backend. Implementations must be cheap to share across workers.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Writes each message to the structured log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if !email.to.contains('@') {
            return Err(MailError::InvalidRecipient(Redacted(&email.to).to_string()));
        }
        info!(
            to = %Redacted(&email.to),
            from = %email.from,
            subject = %email.subject,
            body_len = email.body.len(),
            "email_sent"
        );
        Ok(())
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _email: OutgoingEmail) -> Result<(), MailError> {
        Ok(())
    }
}

/// Keeps messages in memory so tests can inspect them.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<RwLock<Vec<OutgoingEmail>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.read().clone()
    }

    /// Messages addressed to `to`, oldest first.
    pub fn sent_to(&self, to: &str) -> Vec<OutgoingEmail> {
        self.sent
            .read()
            .iter()
            .filter(|m| m.to.eq_ignore_ascii_case(to))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.sent.write().clear();
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.sent.write().push(email);
        Ok(())
    }
}

/// Backend selected by `EMAIL_MODE`.
pub fn mailer_for(config: &EmailConfig) -> Arc<dyn Mailer> {
    match config.mode {
        EmailMode::Log => Arc::new(LogMailer),
        EmailMode::Disabled => Arc::new(DisabledMailer),
    }
}
