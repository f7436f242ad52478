use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;

use crate::credentials::{CredentialSource, ServiceAccountKey};
use crate::error::StorageError;

/// Connection settings for the S3 backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...).
    pub endpoint: Option<String>,
    pub credentials: CredentialSource,
}

fn static_credentials(
    access_key_id: &str,
    secret_access_key: &str,
    session_token: Option<&str>,
) -> Credentials {
    Credentials::new(
        access_key_id,
        secret_access_key,
        session_token.map(str::to_string),
        None,
        "solarbridge-config",
    )
}

/// Build an S3 client from a region and credential source.
pub async fn build_client(settings: &S3Settings) -> Result<Client, StorageError> {
    let mut region = settings.region.clone();
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest());

    match &settings.credentials {
        CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token,
        } => {
            builder = builder.credentials_provider(static_credentials(
                access_key_id,
                secret_access_key,
                session_token.as_deref(),
            ));
        }
        CredentialSource::Profile { profile_name } => {
            builder = builder.profile_name(profile_name);
        }
        CredentialSource::ServiceAccountFile { path } => {
            let key = ServiceAccountKey::load(path)?;
            if let Some(key_region) = &key.region {
                region = key_region.clone();
            }
            builder = builder.credentials_provider(static_credentials(
                &key.access_key_id,
                &key.secret_access_key,
                key.session_token.as_deref(),
            ));
        }
        CredentialSource::DefaultChain => {}
    }

    let sdk_config = builder
        .region(aws_config::Region::new(region))
        .load()
        .await;

    let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
    if let Some(endpoint) = &settings.endpoint {
        s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
    }

    tracing::debug!(
        bucket = %settings.bucket,
        credentials = settings.credentials.kind(),
        "built S3 client"
    );

    Ok(Client::from_conf(s3_config.build()))
}
