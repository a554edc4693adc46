//! 展览审核 API 处理器

use axum::{Json, extract::State};
use kala_core::{ApprovalOutcome, Exhibition};
use tracing::info;

use crate::{
    dto::{ApiResponse, ApprovalResponse, ApproveExhibitionRequest},
    error::Result,
    state::AppState,
};

/// 待审核展览
///
/// GET /api/admin/pending-exhibitions
pub async fn list_pending_exhibitions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Exhibition>>>> {
    let exhibitions = state.exhibitions.list_pending().await?;
    Ok(Json(ApiResponse::success(exhibitions)))
}

/// 审核展览
///
/// POST /api/admin/approve-exhibition
pub async fn approve_exhibition(
    State(state): State<AppState>,
    Json(req): Json<ApproveExhibitionRequest>,
) -> Result<Json<ApiResponse<ApprovalResponse>>> {
    let outcome = state
        .exhibitions
        .approve(req.exhibition_id, req.approved)
        .await?;

    let response = match outcome {
        ApprovalOutcome::Approved(exhibition) => ApprovalResponse {
            exhibition_id: exhibition.id,
            approved: true,
            exhibition: Some(exhibition),
        },
        ApprovalOutcome::Rejected(id) => ApprovalResponse {
            exhibition_id: id,
            approved: false,
            exhibition: None,
        },
    };
    info!(exhibition_id = %response.exhibition_id, approved = response.approved, "展览审核完成");

    Ok(Json(ApiResponse::success(response)))
}
