use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use solarbridge_core::models::assessment::{Assessment, NewAssessment, sort_newest_first};

use crate::clock::SubmissionClock;
use crate::error::StorageError;
use crate::store::AssessmentStore;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Assessment>>,
    clock: SubmissionClock,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AssessmentStore for MemoryStore {
    async fn insert(&self, submission: NewAssessment) -> Result<Assessment, StorageError> {
        submission.check_required()?;

        let mut records = self.records.write().await;
        let assessment = submission.into_assessment(Uuid::new_v4(), self.clock.stamp());
        records.push(assessment.clone());
        Ok(assessment)
    }

    async fn list(&self) -> Result<Vec<Assessment>, StorageError> {
        let mut assessments = self.records.read().await.clone();
        sort_newest_first(&mut assessments);
        Ok(assessments)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
