//! JWT 认证中间件
//!
//! 验证请求中的 Bearer Token 并将用户信息注入请求扩展

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::error::ApiError;
use crate::state::AppState;

/// 公开路由前缀（不需要认证）
const PUBLIC_PATHS: [&str; 4] = [
    "/health",
    "/ready",
    "/api/public/exhibitions",
    "/api/public/exhibition-quote",
];

/// 认证中间件
///
/// 从 Authorization header 中提取 Bearer Token，验证后将 `AuthUser` 注入请求扩展。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if PUBLIC_PATHS.iter().any(|p| path.starts_with(p)) {
        return next.run(request).await;
    }

    let Some(authorization) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        return ApiError::Unauthorized("缺少认证 Token".to_string()).into_response();
    };

    match state.jwt_manager.verify_token(authorization.token()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
