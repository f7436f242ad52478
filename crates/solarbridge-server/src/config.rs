//! Server configuration, read once from the environment at startup.

use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;

use solarbridge_notify::OutboxConfig;
use solarbridge_notify::config::{
    MailCredentials, MailIdentity, SmtpSecurity, SmtpSettings, parse_recipients,
};
use solarbridge_storage::StorageConfig;
use solarbridge_storage::client::S3Settings;
use solarbridge_storage::credentials::CredentialSource;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORAGE_DIR: &str = "data";
const DEFAULT_BUCKET: &str = "solarbridge";
const DEFAULT_REGION: &str = "ap-south-1";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_FROM_NAME: &str = "SolarBridge";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const NOOP_FROM_ADDRESS: &str = "noreply@localhost";
const NOOP_RECIPIENT: &str = "staff@localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; unset or blank means JSON.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        match string_or(&lookup, "LOG_FORMAT", "json").to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(eyre::eyre!(
                "invalid LOG_FORMAT {other:?}: expected json or pretty"
            )),
        }
    }
}

/// Whether a submission waits for its notification email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// Send before answering; a mail failure answers 500.
    #[default]
    Inline,
    /// Queue the email and answer as soon as the record is stored.
    Outbox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailConfig {
    Smtp {
        smtp: SmtpSettings,
        identity: MailIdentity,
    },
    Noop {
        identity: MailIdentity,
    },
}

impl MailConfig {
    pub fn identity(&self) -> &MailIdentity {
        match self {
            MailConfig::Smtp { identity, .. } | MailConfig::Noop { identity } => identity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    pub mode: NotifyMode,
    pub outbox: OutboxConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub cors_origins: Vec<HeaderValue>,
    /// Pre-built frontend served for non-API paths, with SPA fallback.
    pub static_dir: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_origins: DEFAULT_CORS_ORIGINS
                .split(',')
                .map(HeaderValue::from_static)
                .collect(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub log_format: LogFormat,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub notify: NotifyConfig,
    pub http: HttpConfig,
}

/// Parse `name` if set and non-empty, else use `default`.
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> eyre::Result<T>
where
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| eyre::eyre!("invalid {name} {raw:?}: {e}")),
        None => Ok(default),
    }
}

fn string_or(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn storage_config(lookup: &impl Fn(&str) -> Option<String>) -> eyre::Result<StorageConfig> {
    let backend = string_or(lookup, "STORAGE_BACKEND", "file").to_lowercase();
    match backend.as_str() {
        "file" => Ok(StorageConfig::File {
            dir: string_or(lookup, "STORAGE_DIR", DEFAULT_STORAGE_DIR).into(),
        }),
        "s3" => Ok(StorageConfig::S3(S3Settings {
            bucket: string_or(lookup, "S3_BUCKET", DEFAULT_BUCKET),
            region: string_or(lookup, "AWS_REGION", DEFAULT_REGION),
            endpoint: lookup("S3_ENDPOINT").filter(|v| !v.trim().is_empty()),
            credentials: CredentialSource::from_lookup(lookup),
        })),
        "memory" => Ok(StorageConfig::Memory),
        other => Err(eyre::eyre!(
            "invalid STORAGE_BACKEND {other:?}: expected file, s3 or memory"
        )),
    }
}

fn mail_config(lookup: &impl Fn(&str) -> Option<String>) -> eyre::Result<MailConfig> {
    let backend = string_or(lookup, "MAIL_BACKEND", "smtp").to_lowercase();
    let from_name = string_or(lookup, "EMAIL_FROM_NAME", DEFAULT_FROM_NAME);
    let recipients = lookup("RECEIVER_EMAIL")
        .map(|raw| parse_recipients(&raw))
        .unwrap_or_default();

    match backend.as_str() {
        "smtp" => {
            let credentials = MailCredentials::from_lookup(lookup)?;
            let from_address = lookup("EMAIL_FROM")
                .filter(|v| !v.trim().is_empty())
                .or_else(|| credentials.as_ref().map(|c| c.user.clone()))
                .ok_or_else(|| eyre::eyre!("EMAIL_FROM or EMAIL_USER is required for smtp mail"))?;
            if recipients.is_empty() {
                return Err(eyre::eyre!("RECEIVER_EMAIL is required for smtp mail"));
            }
            let security = match lookup("SMTP_SECURITY").filter(|v| !v.trim().is_empty()) {
                Some(raw) => SmtpSecurity::parse(raw.trim())
                    .ok_or_else(|| eyre::eyre!("invalid SMTP_SECURITY {raw:?}"))?,
                None => SmtpSecurity::default(),
            };

            Ok(MailConfig::Smtp {
                smtp: SmtpSettings {
                    host: string_or(lookup, "SMTP_HOST", DEFAULT_SMTP_HOST),
                    port: parse_or(lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                    security,
                    credentials,
                },
                identity: MailIdentity {
                    from_name,
                    from_address,
                    recipients,
                },
            })
        }
        "noop" => Ok(MailConfig::Noop {
            identity: MailIdentity {
                from_name,
                from_address: string_or(lookup, "EMAIL_FROM", NOOP_FROM_ADDRESS),
                recipients: if recipients.is_empty() {
                    vec![NOOP_RECIPIENT.to_string()]
                } else {
                    recipients
                },
            },
        }),
        other => Err(eyre::eyre!(
            "invalid MAIL_BACKEND {other:?}: expected smtp or noop"
        )),
    }
}

fn notify_config(lookup: &impl Fn(&str) -> Option<String>) -> eyre::Result<NotifyConfig> {
    let mode = match string_or(lookup, "NOTIFY_MODE", "inline").to_lowercase().as_str() {
        "inline" => NotifyMode::Inline,
        "outbox" => NotifyMode::Outbox,
        other => {
            return Err(eyre::eyre!(
                "invalid NOTIFY_MODE {other:?}: expected inline or outbox"
            ));
        }
    };
    let defaults = OutboxConfig::default();
    let retry_base_ms: u64 = parse_or(
        lookup,
        "NOTIFY_RETRY_BASE_MS",
        defaults.retry_base.as_millis() as u64,
    )?;

    Ok(NotifyConfig {
        mode,
        outbox: OutboxConfig {
            capacity: parse_or(lookup, "NOTIFY_QUEUE_CAPACITY", defaults.capacity)?,
            max_attempts: parse_or(lookup, "NOTIFY_MAX_ATTEMPTS", defaults.max_attempts)?,
            retry_base: Duration::from_millis(retry_base_ms),
        },
    })
}

fn http_config(lookup: &impl Fn(&str) -> Option<String>) -> eyre::Result<HttpConfig> {
    let raw_origins = string_or(lookup, "CORS_ORIGINS", DEFAULT_CORS_ORIGINS);
    let cors_origins = raw_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| eyre::eyre!("invalid CORS origin {origin:?}: {e}"))
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    Ok(HttpConfig {
        cors_origins,
        static_dir: lookup("STATIC_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from),
    })
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        Ok(Self {
            log_format: LogFormat::from_lookup(&lookup)?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            storage: storage_config(&lookup)?,
            mail: mail_config(&lookup)?,
            notify: notify_config(&lookup)?,
            http: http_config(&lookup)?,
        })
    }
}
