use async_trait::async_trait;

use crate::NotificationSender;
use crate::error::NotifyError;
use crate::message::EmailMessage;

/// Logs instead of sending. Used when mail is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(
            recipients = ?email.to,
            subject = %email.subject,
            "mail disabled, notification not sent"
        );
        Ok(())
    }

    fn transport(&self) -> &'static str {
        "noop"
    }
}
