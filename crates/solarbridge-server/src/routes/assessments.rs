use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use solarbridge_core::models::assessment::{Assessment, NewAssessment, SubmitResponse};
use solarbridge_notify::Delivery;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_assessments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Assessment>>, ApiError> {
    let assessments = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to fetch assessments"))?;

    Ok(Json(assessments))
}

pub async fn submit_assessment(
    State(state): State<AppState>,
    payload: Result<Json<NewAssessment>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(submission) = payload?;

    let assessment = state
        .store
        .insert(submission)
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to submit form"))?;

    tracing::info!(
        assessment_id = %assessment.id,
        backend = state.store.backend(),
        "assessment stored"
    );

    // In inline mode a mail failure still fails the request, even though
    // the record above is already durable.
    let delivery = state.notifier.notify(&assessment).await.map_err(|e| {
        ApiError::internal(format!(
            "assessment {} stored but notification failed: {e}",
            assessment.id
        ))
        .with_message("Failed to submit form")
    })?;

    let message = match delivery {
        Delivery::Sent => "Form submitted and email sent successfully",
        Delivery::Queued | Delivery::Dropped => "Form submitted successfully",
    };

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: message.to_string(),
            id: assessment.id,
        }),
    ))
}

/// JSON 404 for unknown API paths so they never fall through to the SPA.
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound("no such API endpoint".into())
}
