use std::path::PathBuf;
use std::sync::Arc;

use crate::client::{self, S3Settings};
use crate::error::StorageError;
use crate::file::FileStore;
use crate::memory::MemoryStore;
use crate::s3::S3Store;
use crate::store::AssessmentStore;

/// Which backend holds assessments, chosen at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    File { dir: PathBuf },
    S3(S3Settings),
    Memory,
}

/// Construct the configured backend. Does not contact it; call
/// [`AssessmentStore::health_check`] for that.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn AssessmentStore>, StorageError> {
    let store: Arc<dyn AssessmentStore> = match config {
        StorageConfig::File { dir } => Arc::new(FileStore::open(dir)?),
        StorageConfig::S3(settings) => {
            let client = client::build_client(settings).await?;
            Arc::new(S3Store::new(client, &settings.bucket))
        }
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
