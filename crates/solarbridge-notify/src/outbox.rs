//! Notification outbox.
//!
//! Submissions push stored assessments onto a bounded queue and return
//! immediately. A single worker task drains the queue and delivers each
//! notification, retrying with exponential backoff. A notification that
//! still fails after the last attempt is logged with its assessment id and
//! dropped; the assessment itself is already durable.
//!
//! The worker exits once every [`OutboxHandle`] is dropped and the queue is
//! drained, so shutdown is: stop the HTTP server, drop the handles, await the
//! join handle returned by [`spawn_outbox`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use solarbridge_core::models::assessment::Assessment;

use crate::error::NotifyError;
use crate::notifier::AssessmentMailer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboxConfig {
    /// Queue depth before new notifications are dropped.
    pub capacity: usize,
    /// Delivery attempts per notification, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each attempt after.
    pub retry_base: Duration,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            max_attempts: 5,
            retry_base: Duration::from_millis(500),
        }
    }
}

impl OutboxConfig {
    /// Backoff before attempt `attempt` (1-based; the first attempt has none).
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(16);
        self.retry_base.saturating_mul(1 << exponent)
    }
}

/// Counters for the outbox, shared between handles and the worker.
#[derive(Debug, Default)]
pub struct OutboxMetrics {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    retried: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

impl OutboxMetrics {
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn retried(&self) -> u64 {
        self.retried.load(Ordering::Relaxed)
    }

    /// Notifications abandoned after the last attempt.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Notifications refused because the queue was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Notifications taken off the queue and finished, either way.
    pub fn settled(&self) -> u64 {
        self.delivered() + self.failed()
    }
}

/// Cheap, cloneable sending side of the outbox.
#[derive(Clone)]
pub struct OutboxHandle {
    tx: mpsc::Sender<Assessment>,
    metrics: Arc<OutboxMetrics>,
}

impl OutboxHandle {
    pub fn enqueue(&self, assessment: Assessment) -> Result<(), NotifyError> {
        match self.tx.try_send(assessment) {
            Ok(()) => {
                self.metrics.enqueued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
                Err(NotifyError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
                Err(NotifyError::QueueClosed)
            }
        }
    }

    pub fn metrics(&self) -> &Arc<OutboxMetrics> {
        &self.metrics
    }
}

/// Start the outbox worker on the current tokio runtime.
pub fn spawn_outbox(
    mailer: Arc<AssessmentMailer>,
    config: OutboxConfig,
) -> (OutboxHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(config.capacity.max(1));
    let metrics = Arc::new(OutboxMetrics::default());
    let worker = tokio::spawn(run_worker(rx, mailer, config, metrics.clone()));
    (OutboxHandle { tx, metrics }, worker)
}

async fn run_worker(
    mut rx: mpsc::Receiver<Assessment>,
    mailer: Arc<AssessmentMailer>,
    config: OutboxConfig,
    metrics: Arc<OutboxMetrics>,
) {
    tracing::info!(
        capacity = config.capacity,
        max_attempts = config.max_attempts,
        "notification outbox started"
    );

    while let Some(assessment) = rx.recv().await {
        deliver(&mailer, &assessment, &config, &metrics).await;
    }

    tracing::info!(
        delivered = metrics.delivered(),
        failed = metrics.failed(),
        "notification outbox drained"
    );
}

async fn deliver(
    mailer: &AssessmentMailer,
    assessment: &Assessment,
    config: &OutboxConfig,
    metrics: &OutboxMetrics,
) {
    let max_attempts = config.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let delay = config.backoff(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match mailer.notify(assessment).await {
            Ok(()) => {
                metrics.delivered.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    assessment_id = %assessment.id,
                    attempt,
                    "notification delivered"
                );
                return;
            }
            Err(e) if attempt < max_attempts => {
                metrics.retried.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    assessment_id = %assessment.id,
                    attempt,
                    error = %e,
                    "notification attempt failed, will retry"
                );
            }
            Err(e) => {
                metrics.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    assessment_id = %assessment.id,
                    attempts = max_attempts,
                    error = %e,
                    "notification abandoned"
                );
            }
        }
    }
}
