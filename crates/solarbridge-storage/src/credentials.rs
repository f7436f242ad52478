use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Where the S3 backend gets its credentials from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline {
        access_key_id: String,
        secret_access_key: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        session_token: Option<String>,
    },
    Profile {
        profile_name: String,
    },
    /// A service-account key file deployed next to the binary.
    ServiceAccountFile {
        path: PathBuf,
    },
    DefaultChain,
}

/// On-disk shape of a service-account key file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_token: Option<String>,
    /// Overrides the configured region when present.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub region: Option<String>,
}

impl ServiceAccountKey {
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let contents = std::fs::read(path).map_err(|e| {
            StorageError::Credentials(format!(
                "failed to read service-account file {}: {e}",
                path.display()
            ))
        })?;
        serde_json::from_slice(&contents).map_err(|e| {
            StorageError::Credentials(format!(
                "invalid service-account file {}: {e}",
                path.display()
            ))
        })
    }
}

impl CredentialSource {
    /// Pick a source from the process environment.
    ///
    /// Precedence: `STORAGE_CREDENTIALS_FILE`, then `AWS_ACCESS_KEY_ID` with
    /// `AWS_SECRET_ACCESS_KEY`, then `AWS_PROFILE`, then the default chain.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty("STORAGE_CREDENTIALS_FILE") {
            return CredentialSource::ServiceAccountFile { path: path.into() };
        }
        if let (Some(access_key_id), Some(secret_access_key)) = (
            non_empty("AWS_ACCESS_KEY_ID"),
            non_empty("AWS_SECRET_ACCESS_KEY"),
        ) {
            return CredentialSource::Inline {
                access_key_id,
                secret_access_key,
                session_token: non_empty("AWS_SESSION_TOKEN"),
            };
        }
        if let Some(profile_name) = non_empty("AWS_PROFILE") {
            return CredentialSource::Profile { profile_name };
        }
        CredentialSource::DefaultChain
    }

    /// Short label for logs. Never includes secrets.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialSource::Inline { .. } => "inline",
            CredentialSource::Profile { .. } => "profile",
            CredentialSource::ServiceAccountFile { .. } => "service_account_file",
            CredentialSource::DefaultChain => "default_chain",
        }
    }
}
