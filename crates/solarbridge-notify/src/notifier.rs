use std::sync::Arc;

use solarbridge_core::models::assessment::Assessment;

use crate::NotificationSender;
use crate::error::NotifyError;
use crate::message::MessageComposer;
use crate::outbox::OutboxHandle;

/// Composes the staff email for an assessment and hands it to a sender.
pub struct AssessmentMailer {
    composer: MessageComposer,
    sender: Arc<dyn NotificationSender>,
}

impl AssessmentMailer {
    pub fn new(composer: MessageComposer, sender: Arc<dyn NotificationSender>) -> Self {
        Self { composer, sender }
    }

    pub fn sender(&self) -> &Arc<dyn NotificationSender> {
        &self.sender
    }

    pub async fn notify(&self, assessment: &Assessment) -> Result<(), NotifyError> {
        let email = self.composer.compose(assessment)?;
        self.sender.send_email(&email).await
    }
}

/// What happened to the notification for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sent before the response was returned.
    Sent,
    /// Accepted by the outbox; the worker delivers it later.
    Queued,
    /// The outbox could not take it. The record is stored regardless.
    Dropped,
}

/// How a submission's notification is delivered.
#[derive(Clone)]
pub enum Notifier {
    /// Send in the request; a mail failure fails the request.
    Inline(Arc<AssessmentMailer>),
    /// Queue for the outbox worker; the request never waits on mail.
    Outbox(OutboxHandle),
}

impl Notifier {
    pub fn mode(&self) -> &'static str {
        match self {
            Notifier::Inline(_) => "inline",
            Notifier::Outbox(_) => "outbox",
        }
    }

    pub async fn notify(&self, assessment: &Assessment) -> Result<Delivery, NotifyError> {
        match self {
            Notifier::Inline(mailer) => {
                mailer.notify(assessment).await?;
                Ok(Delivery::Sent)
            }
            Notifier::Outbox(handle) => match handle.enqueue(assessment.clone()) {
                Ok(()) => Ok(Delivery::Queued),
                Err(e) => {
                    tracing::error!(
                        assessment_id = %assessment.id,
                        error = %e,
                        "could not queue notification; record is stored"
                    );
                    Ok(Delivery::Dropped)
                }
            },
        }
    }
}
