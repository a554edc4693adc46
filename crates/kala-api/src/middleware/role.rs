//! 角色检查中间件
//!
//! admin 通过所有角色检查

use std::future::Future;
use std::pin::Pin;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use kala_core::Role;

use crate::auth::AuthUser;
use crate::error::ApiError;

/// 角色检查中间件工厂
///
/// # 示例
/// ```ignore
/// .route_layer(axum::middleware::from_fn(require_roles(&[Role::Artist])))
/// ```
pub fn require_roles(
    roles: &'static [Role],
) -> impl Fn(Request<Body>, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone + Send
{
    move |request: Request<Body>, next: Next| {
        Box::pin(async move { check_roles(request, next, roles).await })
    }
}

/// 是否满足角色要求
pub fn is_allowed(role: Role, allowed: &[Role]) -> bool {
    role == Role::Admin || allowed.contains(&role)
}

async fn check_roles(request: Request<Body>, next: Next, allowed: &'static [Role]) -> Response {
    // 由 auth_middleware 注入
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return ApiError::Unauthorized("未认证".to_string()).into_response();
    };

    if is_allowed(user.role, allowed) {
        return next.run(request).await;
    }

    let required: Vec<&str> = allowed.iter().map(Role::as_str).collect();
    ApiError::Forbidden(format!("需要角色: {}", required.join(", "))).into_response()
}
