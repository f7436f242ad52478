use async_trait::async_trait;

use solarbridge_core::models::assessment::{Assessment, NewAssessment};

use crate::error::StorageError;

/// A place assessments are written to and listed from.
///
/// Implementations assign `id` and `submitted_at` on insert, enforce the
/// required fields, and never overwrite an existing record.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Persist a submission and return the stored record.
    async fn insert(&self, submission: NewAssessment) -> Result<Assessment, StorageError>;

    /// Every stored assessment, newest first.
    async fn list(&self) -> Result<Vec<Assessment>, StorageError>;

    /// Cheap reachability check run at startup.
    async fn health_check(&self) -> Result<(), StorageError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
