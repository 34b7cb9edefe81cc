//! Public inquiry submission.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use donghang_core::{InquiryId, NewInquiry};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Message returned for a body that is not the expected JSON object.
pub const MALFORMED_BODY_MESSAGE: &str = "잘못된 요청 형식입니다.";

/// Inquiry form data. Absent fields are caught by validation, not by serde.
#[derive(Debug, Default, Deserialize)]
pub struct InquiryForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub inquiry: Option<String>,
}

/// Response for a stored inquiry.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub id: InquiryId,
}

/// Submit an inquiry.
///
/// POST /api/inquiry
///
/// Validates the form, stores it as unread, then fires the new-inquiry
/// notification on a detached task. The response never waits for the
/// notification.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<InquiryForm>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>)> {
    let Json(form) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected inquiry body");
        AppError::BadRequest(MALFORMED_BODY_MESSAGE.to_string())
    })?;

    let new = NewInquiry::validate(
        form.name.as_deref(),
        form.phone.as_deref(),
        form.inquiry.as_deref(),
    )
    .inspect_err(|e| tracing::info!(rule = e.rule(), "Inquiry failed validation"))?;

    let inquiry = state.inquiries().create(&new).await?;

    // Detached; the response does not wait for delivery
    state.notifier().spawn(&new);

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "문의가 성공적으로 접수되었습니다.".to_string(),
            id: inquiry.id,
        }),
    ))
}
