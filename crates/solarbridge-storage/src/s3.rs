use async_trait::async_trait;
use aws_sdk_s3::Client;
use tokio::sync::OnceCell;
use uuid::Uuid;

use solarbridge_core::keys;
use solarbridge_core::models::assessment::{Assessment, NewAssessment, sort_newest_first};

use crate::clock::SubmissionClock;
use crate::error::StorageError;
use crate::objects;
use crate::store::AssessmentStore;

/// Document store backed by an S3 bucket, one JSON object per assessment.
pub struct S3Store {
    client: Client,
    bucket: String,
    clock: SubmissionClock,
    /// Set once the clock has seen every record in the bucket.
    seeded: OnceCell<()>,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            clock: SubmissionClock::new(),
            seeded: OnceCell::new(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Fetch every stored assessment, unsorted, raising the clock past each.
    async fn fetch_all(&self) -> Result<Vec<Assessment>, StorageError> {
        let object_keys =
            objects::list_objects(&self.client, &self.bucket, keys::ASSESSMENTS_PREFIX).await?;

        let mut assessments = Vec::new();
        for key in object_keys.iter().filter(|k| keys::is_assessment_key(k)) {
            let body = objects::get_object(&self.client, &self.bucket, key).await?;
            let assessment: Assessment = serde_json::from_slice(&body)?;
            self.clock.observe(assessment.submitted_at);
            assessments.push(assessment);
        }
        Ok(assessments)
    }

    /// Before the first insert, move the clock past the newest stored record.
    async fn seed_clock(&self) -> Result<(), StorageError> {
        self.seeded
            .get_or_try_init(|| async {
                let existing = self.fetch_all().await?;
                tracing::debug!(
                    bucket = %self.bucket,
                    records = existing.len(),
                    "submission clock seeded from bucket"
                );
                Ok::<_, StorageError>(())
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AssessmentStore for S3Store {
    async fn insert(&self, submission: NewAssessment) -> Result<Assessment, StorageError> {
        submission.check_required()?;
        self.seed_clock().await?;

        let id = Uuid::new_v4();
        let assessment = submission.into_assessment(id, self.clock.stamp());
        let key = keys::assessment(id);
        let body = serde_json::to_vec(&assessment)?;

        objects::put_object_if_absent(
            &self.client,
            &self.bucket,
            &key,
            body,
            Some("application/json"),
        )
        .await?;

        tracing::debug!(bucket = %self.bucket, key = %key, "assessment written to S3");
        Ok(assessment)
    }

    async fn list(&self) -> Result<Vec<Assessment>, StorageError> {
        let mut assessments = self.fetch_all().await?;
        // A full listing seeds the clock as well as seed_clock would.
        let _ = self.seeded.set(());

        sort_newest_first(&mut assessments);
        Ok(assessments)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        objects::head_bucket(&self.client, &self.bucket).await
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
