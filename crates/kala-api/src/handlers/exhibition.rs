//! 展览 API 处理器

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use kala_core::exhibition::{FeeBreakdown, PublicFilter, parse_tier};
use kala_core::Exhibition;
use validator::Validate;

use crate::{
    auth::AuthUser,
    dto::{ApiResponse, CreateExhibitionRequest, FeeQuoteQuery},
    error::Result,
    state::AppState,
};

async fn list_public(state: &AppState, filter: PublicFilter) -> Result<Json<ApiResponse<Vec<Exhibition>>>> {
    let exhibitions = state.exhibitions.list_public(filter).await?;
    Ok(Json(ApiResponse::success(exhibitions)))
}

/// GET /api/public/exhibitions
pub async fn list_exhibitions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Exhibition>>>> {
    list_public(&state, PublicFilter::All).await
}

/// GET /api/public/exhibitions/active
pub async fn list_active_exhibitions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Exhibition>>>> {
    list_public(&state, PublicFilter::Active).await
}

/// GET /api/public/exhibitions/archived
pub async fn list_archived_exhibitions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Exhibition>>>> {
    list_public(&state, PublicFilter::Archived).await
}

/// 展览报价
///
/// GET /api/public/exhibition-quote?exhibitionType=&artworkCount=
pub async fn quote_fee(
    State(state): State<AppState>,
    Query(query): Query<FeeQuoteQuery>,
) -> Result<Json<ApiResponse<FeeBreakdown>>> {
    let tier = parse_tier(query.exhibition_type.as_deref())?;
    let fee = state.exhibitions.quote(tier, query.artwork_count)?;
    Ok(Json(ApiResponse::success(fee)))
}

/// 艺术家的展览
///
/// GET /api/artist/exhibitions
pub async fn list_my_exhibitions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Exhibition>>>> {
    let exhibitions = state.exhibitions.list_for_artist(&user.user_id).await?;
    Ok(Json(ApiResponse::success(exhibitions)))
}

/// 提交展览
///
/// POST /api/artist/exhibitions
pub async fn create_exhibition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateExhibitionRequest>,
) -> Result<Json<ApiResponse<Exhibition>>> {
    req.validate()?;

    let exhibition = state.exhibitions.create(&user.user_id, req.into()).await?;
    Ok(Json(ApiResponse::success_with_message(
        exhibition,
        "展览已提交，等待审核",
    )))
}
