//! Message composition for account and RSVP notifications.
//!
//! Every method logs delivery failures and returns normally; a lost email
//! never fails the request that triggered it.

use std::sync::Arc;

use tracing::warn;

use super::mailer::{Mailer, OutgoingEmail};
use crate::config::email::EmailConfig;
use crate::domain::schedule;
use crate::logging::pii::Redacted;
use crate::repos::events::Event;
use crate::repos::users::User;

pub const ACTIVATION_SUBJECT: &str = "Activate Your Account - Event Management System";
pub const ACTIVATION_REMINDER_SUBJECT: &str = "Activate Your Account - Reminder";

#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    config: EmailConfig,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, config: EmailConfig) -> Self {
        Self { mailer, config }
    }

    pub fn activation_link(&self, uidb64: &str, token: &str) -> String {
        format!(
            "{}/api/accounts/activate/{uidb64}/{token}",
            self.config.public_base_url
        )
    }

    pub async fn activation(&self, user: &User, uidb64: &str, token: &str) {
        let body = format!(
            "Hi {},\n\nThanks for signing up. Activate your account by opening this link:\n\n{}\n\nThe link expires in 3 days.\n",
            user.full_name(),
            self.activation_link(uidb64, token)
        );
        self.deliver(&user.email, ACTIVATION_SUBJECT.to_string(), body)
            .await;
    }

    pub async fn activation_reminder(&self, user: &User, uidb64: &str, token: &str) {
        let body = format!(
            "Hi {},\n\nYour account is not active yet. Here is a fresh activation link:\n\n{}\n\nThe link expires in 3 days.\n",
            user.full_name(),
            self.activation_link(uidb64, token)
        );
        self.deliver(&user.email, ACTIVATION_REMINDER_SUBJECT.to_string(), body)
            .await;
    }

    pub async fn rsvp_confirmed(&self, user: &User, event: &Event) {
        let body = format!(
            "Hi {},\n\nYou're going to {}.\n\n{}\n",
            user.full_name(),
            event.name,
            event_lines(event)
        );
        self.deliver(&user.email, format!("RSVP Confirmation for {}", event.name), body)
            .await;
    }

    pub async fn rsvp_updated(&self, user: &User, event: &Event) {
        let body = format!(
            "Hi {},\n\nYour RSVP for {} was updated.\n\n{}\n",
            user.full_name(),
            event.name,
            event_lines(event)
        );
        self.deliver(&user.email, format!("RSVP Updated for {}", event.name), body)
            .await;
    }

    pub async fn rsvp_cancelled(&self, user: &User, event: &Event) {
        let body = format!(
            "Hi {},\n\nYour RSVP for {} on {} has been cancelled.\n",
            user.full_name(),
            event.name,
            schedule::format_date(event.date)
        );
        self.deliver(&user.email, format!("RSVP Cancelled for {}", event.name), body)
            .await;
    }

    async fn deliver(&self, to: &str, subject: String, body: String) {
        let email = OutgoingEmail {
            from: self.config.from_address.clone(),
            to: to.to_string(),
            subject,
            body,
        };
        if let Err(e) = self.mailer.send(email).await {
            warn!(to = %Redacted(to), error = %e, "email delivery failed");
        }
    }
}

fn event_lines(event: &Event) -> String {
    format!(
        "Date: {}\nTime: {}\nLocation: {}",
        schedule::format_date(event.date),
        schedule::format_time(event.time),
        event.location
    )
}
