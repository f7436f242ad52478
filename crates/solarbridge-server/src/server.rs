use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use solarbridge_notify::message::MessageComposer;
use solarbridge_notify::{
    AssessmentMailer, NoopNotificationSender, NotificationSender, Notifier,
    SmtpNotificationSender, spawn_outbox,
};
use solarbridge_storage::{AssessmentStore, open_store};

use crate::app::build_router;
use crate::config::{MailConfig, NotifyConfig, NotifyMode, ServerConfig};
use crate::state::AppState;

/// How long shutdown waits for queued notifications to go out.
const OUTBOX_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Open and health-check the configured storage backend. Any failure here is
/// fatal: the server never starts without working storage.
pub async fn connect_storage(config: &ServerConfig) -> eyre::Result<Arc<dyn AssessmentStore>> {
    let store = open_store(&config.storage).await?;
    store
        .health_check()
        .await
        .map_err(|e| eyre::eyre!("{} storage backend unreachable: {e}", store.backend()))?;
    tracing::info!(backend = store.backend(), "storage ready");
    Ok(store)
}

pub fn build_sender(mail: &MailConfig) -> eyre::Result<Arc<dyn NotificationSender>> {
    let sender: Arc<dyn NotificationSender> = match mail {
        MailConfig::Smtp { smtp, .. } => Arc::new(SmtpNotificationSender::new(smtp)?),
        MailConfig::Noop { .. } => Arc::new(NoopNotificationSender),
    };
    Ok(sender)
}

/// Check the mail transport. Failure is logged, never fatal: submissions are
/// still stored and a bad account only shows up when mail is sent.
pub async fn verify_mail(sender: &dyn NotificationSender) {
    match sender.verify().await {
        Ok(()) => tracing::info!(transport = sender.transport(), "mail transport ready"),
        Err(e) => tracing::error!(
            transport = sender.transport(),
            error = %e,
            "mail transport verification failed"
        ),
    }
}

/// Build the notifier for the configured mode. The join handle is present
/// only in outbox mode.
pub fn build_notifier(
    mailer: Arc<AssessmentMailer>,
    notify: &NotifyConfig,
) -> (Notifier, Option<JoinHandle<()>>) {
    match notify.mode {
        NotifyMode::Inline => (Notifier::Inline(mailer), None),
        NotifyMode::Outbox => {
            let (handle, worker) = spawn_outbox(mailer, notify.outbox);
            (Notifier::Outbox(handle), Some(worker))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

/// Run the server until a shutdown signal arrives.
///
/// Startup order: storage (fatal on failure), mail transport (logged),
/// notifier, HTTP listener. On shutdown the listener stops first, then the
/// outbox drains.
pub async fn run(config: ServerConfig) -> eyre::Result<()> {
    let store = connect_storage(&config).await?;

    let sender = build_sender(&config.mail)?;
    verify_mail(sender.as_ref()).await;

    let composer = MessageComposer::new(config.mail.identity().clone())?;
    let mailer = Arc::new(AssessmentMailer::new(composer, sender));
    let (notifier, worker) = build_notifier(mailer, &config.notify);
    tracing::info!(mode = notifier.mode(), "notifications configured");

    let app = build_router(AppState::new(store, notifier), &config.http);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router, and with it every outbox handle, is gone now; the worker
    // finishes what is queued and exits.
    if let Some(worker) = worker {
        match tokio::time::timeout(OUTBOX_DRAIN_TIMEOUT, worker).await {
            Ok(Ok(())) => tracing::info!("notification outbox stopped"),
            Ok(Err(e)) => tracing::error!(error = %e, "notification outbox panicked"),
            Err(_) => tracing::warn!("timed out draining notification outbox"),
        }
    }

    tracing::info!("server stopped");
    Ok(())
}
