//! Admin inbox API.
//!
//! Every handler takes [`RequireAdmin`] first, so an unauthenticated call is
//! rejected before the body is read or the store is touched.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use donghang_core::{Inquiry, InquiryId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::routes::inquiry::MALFORMED_BODY_MESSAGE;
use crate::state::AppState;

/// The only supported update action.
pub const MARK_AS_READ: &str = "markAsRead";

const NOT_FOUND_MESSAGE: &str = "문의를 찾을 수 없습니다.";

/// PATCH body.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<String>,
    pub action: Option<String>,
}

/// DELETE query string.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// Plain confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// List all inquiries, newest first.
///
/// GET /api/inquiries
#[instrument(skip_all)]
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Inquiry>>> {
    let inquiries = state.inquiries().list().await?;
    tracing::debug!(count = inquiries.len(), "Listed inquiries");
    Ok(Json(inquiries))
}

/// Apply an action to one inquiry. Only `markAsRead` exists.
///
/// PATCH /api/inquiries
#[instrument(skip_all)]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(request) =
        payload.map_err(|_| AppError::BadRequest(MALFORMED_BODY_MESSAGE.to_string()))?;

    let (Some(id), Some(action)) = (non_empty(request.id), non_empty(request.action)) else {
        return Err(AppError::BadRequest("ID와 액션을 지정해주세요.".to_string()));
    };

    if action != MARK_AS_READ {
        return Err(AppError::BadRequest("알 수 없는 액션입니다.".to_string()));
    }

    let id = parse_id(&id)?;
    if !state.inquiries().mark_as_read(id).await? {
        return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    let inquiry_id = id.to_string();
    add_breadcrumb(
        "admin",
        "Marked inquiry as read",
        Some(&[("inquiry_id", inquiry_id.as_str())]),
    );
    Ok(MessageResponse::new("읽음 처리되었습니다."))
}

/// Permanently delete one inquiry.
///
/// DELETE /api/inquiries?id=<uuid>
#[instrument(skip_all)]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MessageResponse>> {
    let Some(id) = non_empty(params.id) else {
        return Err(AppError::BadRequest(
            "삭제할 문의 ID를 지정해주세요.".to_string(),
        ));
    };

    let id = parse_id(&id)?;
    if !state.inquiries().delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    let inquiry_id = id.to_string();
    add_breadcrumb(
        "admin",
        "Deleted inquiry",
        Some(&[("inquiry_id", inquiry_id.as_str())]),
    );
    Ok(MessageResponse::new("문의가 삭제되었습니다."))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A string that is not a UUID cannot name a stored inquiry.
fn parse_id(raw: &str) -> Result<InquiryId> {
    InquiryId::parse(raw).ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
}
