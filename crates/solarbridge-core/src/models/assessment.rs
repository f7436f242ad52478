use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// A stored solar-feasibility assessment.
///
/// `id` and `submitted_at` are assigned by the storage layer on insert and
/// never taken from the client. Records are immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Assessment {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_bill: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrace_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_knowledge: Option<String>,
    pub submitted_at: jiff::Timestamp,
}

/// The submission payload: an [`Assessment`] without `id` or `submittedAt`.
///
/// Unknown keys are ignored, so a client-sent `id` or `submittedAt` never
/// reaches storage. `name` and `email` default to empty here and are
/// enforced by [`NewAssessment::check_required`] at write time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewAssessment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_bill: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrace_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_knowledge: Option<String>,
}

impl NewAssessment {
    /// Required-field constraint applied by every storage backend.
    pub fn check_required(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(CoreError::MissingField("email"));
        }
        Ok(())
    }

    /// Stamp the submission with its storage-assigned identity.
    pub fn into_assessment(self, id: Uuid, submitted_at: jiff::Timestamp) -> Assessment {
        Assessment {
            id,
            name: self.name,
            email: self.email,
            contact: self.contact,
            address: self.address,
            city: self.city,
            pincode: self.pincode,
            peak_consumption: self.peak_consumption,
            lowest_consumption: self.lowest_consumption,
            monthly_consumption: self.monthly_consumption,
            monthly_bill: self.monthly_bill,
            terrace_area: self.terrace_area,
            grid_knowledge: self.grid_knowledge,
            submitted_at,
        }
    }
}

/// Body of a successful `POST /api/submit-assessment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitResponse {
    pub message: String,
    pub id: Uuid,
}

/// Order assessments newest first. Ties on `submitted_at` fall back to id so
/// the order is total and stable across backends.
pub fn sort_newest_first(assessments: &mut [Assessment]) {
    assessments.sort_by(|a, b| {
        b.submitted_at
            .cmp(&a.submitted_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
