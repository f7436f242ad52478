//! solarbridge-notify
//!
//! Staff notifications for new assessments: HTML message composition, the
//! [`NotificationSender`] seam with SMTP and no-op implementations, and an
//! outbox worker that retries delivery off the request path.

pub mod config;
pub mod error;
pub mod message;
pub mod noop;
pub mod notifier;
pub mod outbox;
pub mod smtp;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::message::EmailMessage;

/// Transmits a composed email.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotifyError>;

    /// Check the transport is usable (reachable, credentials accepted).
    async fn verify(&self) -> Result<(), NotifyError> {
        Ok(())
    }

    fn transport(&self) -> &'static str;
}

pub use noop::NoopNotificationSender;
pub use notifier::{AssessmentMailer, Delivery, Notifier};
pub use outbox::{OutboxConfig, OutboxHandle, OutboxMetrics, spawn_outbox};
pub use smtp::SmtpNotificationSender;
