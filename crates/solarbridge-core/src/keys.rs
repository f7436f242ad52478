//! Storage key/path conventions.
//!
//! Pure string functions shared by every storage backend. The file backend
//! maps keys onto paths below its data directory; the S3 backend uses them
//! verbatim as object keys.

use uuid::Uuid;

use crate::error::CoreError;

pub const ASSESSMENTS_PREFIX: &str = "assessments/";

const ASSESSMENT_SUFFIX: &str = ".json";

pub fn assessment(id: Uuid) -> String {
    format!("{ASSESSMENTS_PREFIX}{id}{ASSESSMENT_SUFFIX}")
}

/// Recover the assessment id from a key produced by [`assessment`].
///
/// Accepts a bare file name (`{id}.json`) as well as the full prefixed key.
pub fn assessment_id(key: &str) -> Result<Uuid, CoreError> {
    let name = key.strip_prefix(ASSESSMENTS_PREFIX).unwrap_or(key);
    let stem = name.strip_suffix(ASSESSMENT_SUFFIX).unwrap_or(name);
    Ok(Uuid::parse_str(stem)?)
}

/// True for keys that hold a stored assessment (skips temp files and markers).
pub fn is_assessment_key(key: &str) -> bool {
    key.ends_with(ASSESSMENT_SUFFIX) && assessment_id(key).is_ok()
}
