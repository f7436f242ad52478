use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// SMTP account used to send notifications.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailCredentials {
    pub user: String,
    pub pass: String,
}

impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

impl MailCredentials {
    /// Read `{"user": ..., "pass": ...}` from a credential file.
    pub fn load(path: &Path) -> Result<Self, NotifyError> {
        let contents = std::fs::read(path).map_err(|e| {
            NotifyError::Config(format!(
                "failed to read mail credentials {}: {e}",
                path.display()
            ))
        })?;
        serde_json::from_slice(&contents).map_err(|e| {
            NotifyError::Config(format!(
                "invalid mail credentials {}: {e}",
                path.display()
            ))
        })
    }

    /// `MAIL_CREDENTIALS_FILE` wins over `EMAIL_USER` / `EMAIL_PASS`.
    /// Returns `None` when neither is configured.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, NotifyError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty("MAIL_CREDENTIALS_FILE") {
            return Self::load(Path::new(&path)).map(Some);
        }
        match (non_empty("EMAIL_USER"), non_empty("EMAIL_PASS")) {
            (Some(user), Some(pass)) => Ok(Some(Self { user, pass })),
            (None, None) => Ok(None),
            _ => Err(NotifyError::Config(
                "EMAIL_USER and EMAIL_PASS must be set together".into(),
            )),
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS, usually port 465).
    #[default]
    Implicit,
    /// Plain connection upgraded with STARTTLS (usually port 587).
    StartTls,
    /// No encryption. Only for local catchers such as Mailpit.
    Plain,
}

impl SmtpSecurity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "implicit" | "tls" | "smtps" => Some(Self::Implicit),
            "starttls" => Some(Self::StartTls),
            "plain" | "none" => Some(Self::Plain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub credentials: Option<MailCredentials>,
}

/// Sender and fixed staff recipients for notification emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailIdentity {
    pub from_name: String,
    pub from_address: String,
    pub recipients: Vec<String>,
}

impl MailIdentity {
    /// `"Name" <address>` form used in the From header.
    pub fn from_header(&self) -> String {
        format!("\"{}\" <{}>", self.from_name, self.from_address)
    }
}

/// Split a comma-separated recipient list, dropping blanks.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
