use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::NotificationSender;
use crate::config::{SmtpSecurity, SmtpSettings};
use crate::error::NotifyError;
use crate::message::EmailMessage;

/// Sends notifications through an authenticated SMTP relay.
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Convert a composed message into a lettre `Message`.
pub fn build_message(email: &EmailMessage) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);

    for recipient in &email.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    builder
        .body(email.html.clone())
        .map_err(|e| NotifyError::Build(e.to_string()))
}

impl SmtpNotificationSender {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let mut builder = match settings.security {
            SmtpSecurity::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| NotifyError::Config(e.to_string()))?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| NotifyError::Config(e.to_string()))?
            }
            SmtpSecurity::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };

        builder = builder.port(settings.port);
        if let Some(creds) = &settings.credentials {
            builder = builder.credentials(Credentials::new(creds.user.clone(), creds.pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            host: settings.host.clone(),
        })
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotifyError> {
        let message = build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        tracing::info!(
            host = %self.host,
            recipients = email.to.len(),
            subject = %email.subject,
            "notification email sent"
        );
        Ok(())
    }

    async fn verify(&self) -> Result<(), NotifyError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(NotifyError::Transport(format!(
                "SMTP server {} did not accept the connection",
                self.host
            ))),
            Err(e) => Err(NotifyError::Transport(e.to_string())),
        }
    }

    fn transport(&self) -> &'static str {
        "smtp"
    }
}
