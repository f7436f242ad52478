use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jiff::Timestamp;
use uuid::Uuid;

use solarbridge_core::keys;
use solarbridge_core::models::assessment::{Assessment, NewAssessment, sort_newest_first};

use crate::clock::SubmissionClock;
use crate::error::StorageError;
use crate::store::AssessmentStore;

/// Flat-file store: one pretty-printed JSON document per assessment under
/// `<root>/assessments/`.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    clock: SubmissionClock,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// The clock starts after the newest record already on disk, so new
    /// submissions list first even if the wall clock went back since they
    /// were written.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let records = root.join(keys::ASSESSMENTS_PREFIX);
        std::fs::create_dir_all(&records)?;

        let clock = match latest_submission(&records)? {
            Some(latest) => SubmissionClock::starting_after(latest),
            None => SubmissionClock::new(),
        };
        Ok(Self { root, clock })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn records_dir(&self) -> PathBuf {
        self.root.join(keys::ASSESSMENTS_PREFIX)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

fn latest_submission(records: &Path) -> Result<Option<Timestamp>, StorageError> {
    let mut latest = None;
    for entry in std::fs::read_dir(records)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !keys::is_assessment_key(name) {
            continue;
        }
        let body = std::fs::read(entry.path())?;
        let assessment: Assessment = serde_json::from_slice(&body)?;
        latest = latest.max(Some(assessment.submitted_at));
    }
    Ok(latest)
}

#[async_trait]
impl AssessmentStore for FileStore {
    async fn insert(&self, submission: NewAssessment) -> Result<Assessment, StorageError> {
        submission.check_required()?;

        let id = Uuid::new_v4();
        let assessment = submission.into_assessment(id, self.clock.stamp());
        let key = keys::assessment(id);
        let path = self.path_for(&key);

        if tokio::fs::try_exists(&path).await? {
            return Err(StorageError::AlreadyExists { key });
        }

        // Atomic write: tmp + rename, so a listing never sees a partial file.
        let json = serde_json::to_vec_pretty(&assessment)?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!(path = %path.display(), "assessment written to disk");
        Ok(assessment)
    }

    async fn list(&self) -> Result<Vec<Assessment>, StorageError> {
        let mut entries = tokio::fs::read_dir(self.records_dir()).await?;
        let mut assessments = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !keys::is_assessment_key(name) {
                continue;
            }
            let body = tokio::fs::read(entry.path()).await?;
            let assessment: Assessment = serde_json::from_slice(&body)?;
            self.clock.observe(assessment.submitted_at);
            assessments.push(assessment);
        }

        sort_newest_first(&mut assessments);
        Ok(assessments)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        let dir = self.records_dir();
        let meta = tokio::fs::metadata(&dir).await?;
        if !meta.is_dir() {
            return Err(StorageError::Unavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        if meta.permissions().readonly() {
            return Err(StorageError::Unavailable(format!(
                "{} is read-only",
                dir.display()
            )));
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
