use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use solarbridge_core::models::assessment::{Assessment, NewAssessment};
use solarbridge_notify::config::MailIdentity;
use solarbridge_notify::error::NotifyError;
use solarbridge_notify::message::{EmailMessage, MessageComposer};
use solarbridge_notify::{
    AssessmentMailer, Delivery, NotificationSender, Notifier, OutboxConfig, spawn_outbox,
};
use uuid::Uuid;

/// Fails the first `failures` sends, then records every message.
#[derive(Default)]
struct FlakySender {
    failures: u32,
    calls: AtomicU32,
    sent: Mutex<Vec<EmailMessage>>,
}

impl FlakySender {
    fn failing(failures: u32) -> Self {
        Self {
            failures,
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for FlakySender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotifyError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(NotifyError::Transport("421 try again later".into()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    fn transport(&self) -> &'static str {
        "flaky"
    }
}

fn mailer(sender: Arc<FlakySender>) -> Arc<AssessmentMailer> {
    let composer = MessageComposer::new(MailIdentity {
        from_name: "SolarBridge".into(),
        from_address: "leads@solarbridge.example".into(),
        recipients: vec!["ops@solarbridge.example".into()],
    })
    .unwrap();
    Arc::new(AssessmentMailer::new(composer, sender))
}

fn assessment(name: &str) -> Assessment {
    NewAssessment {
        name: name.into(),
        email: "lead@example.com".into(),
        ..Default::default()
    }
    .into_assessment(Uuid::new_v4(), jiff::Timestamp::now())
}

fn fast_config(max_attempts: u32) -> OutboxConfig {
    OutboxConfig {
        capacity: 16,
        max_attempts,
        retry_base: Duration::from_millis(1),
    }
}

#[test]
fn backoff_doubles() {
    let config = OutboxConfig {
        retry_base: Duration::from_millis(100),
        ..Default::default()
    };
    assert_eq!(config.backoff(1), Duration::ZERO);
    assert_eq!(config.backoff(2), Duration::from_millis(100));
    assert_eq!(config.backoff(3), Duration::from_millis(200));
    assert_eq!(config.backoff(5), Duration::from_millis(800));
}

#[tokio::test]
async fn retries_until_delivered() {
    let sender = Arc::new(FlakySender::failing(2));
    let (handle, worker) = spawn_outbox(mailer(sender.clone()), fast_config(5));
    let metrics = handle.metrics().clone();

    let notifier = Notifier::Outbox(handle);
    let delivery = notifier.notify(&assessment("Asha Rao")).await.unwrap();
    assert_eq!(delivery, Delivery::Queued);

    drop(notifier);
    worker.await.unwrap();

    assert_eq!(metrics.delivered(), 1);
    assert_eq!(metrics.retried(), 2);
    assert_eq!(metrics.failed(), 0);
    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("Asha Rao"));
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let sender = Arc::new(FlakySender::failing(u32::MAX));
    let (handle, worker) = spawn_outbox(mailer(sender.clone()), fast_config(3));
    let metrics = handle.metrics().clone();

    handle.enqueue(assessment("Ravi")).unwrap();
    drop(handle);
    worker.await.unwrap();

    assert_eq!(sender.calls.load(Ordering::SeqCst), 3);
    assert_eq!(metrics.failed(), 1);
    assert_eq!(metrics.delivered(), 0);
    assert_eq!(metrics.settled(), 1);
}

#[tokio::test]
async fn drains_queue_on_shutdown() {
    let sender = Arc::new(FlakySender::default());
    let (handle, worker) = spawn_outbox(mailer(sender.clone()), fast_config(1));
    let metrics = handle.metrics().clone();

    for i in 0..10 {
        handle.enqueue(assessment(&format!("lead {i}"))).unwrap();
    }
    drop(handle);
    worker.await.unwrap();

    assert_eq!(metrics.enqueued(), 10);
    assert_eq!(metrics.delivered(), 10);
    assert_eq!(sender.sent().len(), 10);
}

#[tokio::test(flavor = "current_thread")]
async fn full_queue_drops_without_failing_submission() {
    let sender = Arc::new(FlakySender::default());
    let config = OutboxConfig {
        capacity: 1,
        ..fast_config(1)
    };
    let (handle, worker) = spawn_outbox(mailer(sender), config);
    let metrics = handle.metrics().clone();
    let notifier = Notifier::Outbox(handle.clone());

    // The worker has not run yet on this single-threaded runtime, so the
    // second item finds the queue full.
    assert_eq!(
        notifier.notify(&assessment("first")).await.unwrap(),
        Delivery::Queued
    );
    assert_eq!(
        notifier.notify(&assessment("second")).await.unwrap(),
        Delivery::Dropped
    );
    assert!(matches!(
        handle.enqueue(assessment("third")),
        Err(NotifyError::QueueFull)
    ));
    assert_eq!(metrics.dropped(), 2);

    drop(notifier);
    drop(handle);
    worker.await.unwrap();
    assert_eq!(metrics.delivered(), 1);
}

#[tokio::test]
async fn inline_surfaces_send_failure() {
    let sender = Arc::new(FlakySender::failing(1));
    let notifier = Notifier::Inline(mailer(sender.clone()));
    assert_eq!(notifier.mode(), "inline");

    assert!(matches!(
        notifier.notify(&assessment("Asha Rao")).await,
        Err(NotifyError::Transport(_))
    ));
    assert_eq!(
        notifier.notify(&assessment("Asha Rao")).await.unwrap(),
        Delivery::Sent
    );
    assert_eq!(sender.sent().len(), 1);
}
