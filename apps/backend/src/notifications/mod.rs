//! Outgoing email: transport (`Mailer`) and message composition (`Notifier`).

pub mod mailer;
pub mod notifier;

pub use mailer::{mailer_for, DisabledMailer, LogMailer, MailError, Mailer, OutgoingEmail, RecordingMailer};
pub use notifier::Notifier;
