//! 课程咨询 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use kala_core::{Enquiry, EnquirySubmission, MatchesView, RevealedContact};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    dto::{ApiResponse, RevealContactRequest, SubmitEnquiryRequest},
    error::Result,
    state::AppState,
};

/// 提交课程咨询
///
/// POST /api/public/art-class-enquiry
pub async fn submit_enquiry(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SubmitEnquiryRequest>,
) -> Result<Json<ApiResponse<EnquirySubmission>>> {
    req.validate()?;

    let submission = state.intake.submit(&user.user_id, req.into()).await?;
    let message = if submission.matched_count > 0 {
        format!("已为您匹配 {} 位艺术家", submission.matched_count)
    } else {
        "暂无匹配的艺术家，我们会尽快为您联系".to_string()
    };

    Ok(Json(ApiResponse::success_with_message(submission, message)))
}

/// 查看匹配结果
///
/// GET /api/public/art-class-matches/{enquiry_id}
pub async fn get_matches(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(enquiry_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MatchesView>>> {
    let view = state
        .reveal_gate
        .get_matches(enquiry_id, &user.user_id)
        .await?;

    Ok(Json(ApiResponse::success(view)))
}

/// 揭示艺术家联系方式
///
/// POST /api/public/reveal-contact
pub async fn reveal_contact(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RevealContactRequest>,
) -> Result<Json<ApiResponse<RevealedContact>>> {
    req.validate()?;

    let revealed = state
        .reveal_gate
        .reveal(req.enquiry_id, &req.artist_id, &user.user_id)
        .await?;

    Ok(Json(ApiResponse::success(revealed)))
}

/// 我的咨询
///
/// GET /api/user/my-enquiries
pub async fn my_enquiries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Enquiry>>>> {
    let enquiries = state.intake.list_for_user(&user.user_id).await?;
    Ok(Json(ApiResponse::success(enquiries)))
}
