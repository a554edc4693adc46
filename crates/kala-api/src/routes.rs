//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Json, Router, middleware,
    routing::get,
    routing::post,
};
use kala_core::Role;
use kala_shared::observability::middleware as obs_middleware;

use crate::{
    handlers,
    middleware::{auth_middleware, require_roles},
    state::AppState,
};

/// 课程咨询路由（需要登录）
fn enquiry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/public/art-class-enquiry",
            post(handlers::enquiry::submit_enquiry),
        )
        .route(
            "/public/art-class-matches/{enquiry_id}",
            get(handlers::enquiry::get_matches),
        )
        .route(
            "/public/reveal-contact",
            post(handlers::enquiry::reveal_contact),
        )
        .route("/user/my-enquiries", get(handlers::enquiry::my_enquiries))
}

/// 公开展览路由
fn public_exhibition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/public/exhibitions",
            get(handlers::exhibition::list_exhibitions),
        )
        .route(
            "/public/exhibitions/active",
            get(handlers::exhibition::list_active_exhibitions),
        )
        .route(
            "/public/exhibitions/archived",
            get(handlers::exhibition::list_archived_exhibitions),
        )
        .route(
            "/public/exhibition-quote",
            get(handlers::exhibition::quote_fee),
        )
}

/// 艺术家路由
fn artist_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/artist/exhibitions",
            get(handlers::exhibition::list_my_exhibitions)
                .post(handlers::exhibition::create_exhibition),
        )
        .route_layer(middleware::from_fn(require_roles(&[Role::Artist])))
}

/// 管理员路由
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/pending-exhibitions",
            get(handlers::admin::list_pending_exhibitions),
        )
        .route(
            "/admin/approve-exhibition",
            post(handlers::admin::approve_exhibition),
        )
        .route_layer(middleware::from_fn(require_roles(&[Role::Admin])))
}

/// 构建全部 API 路由（挂载在 /api 下）
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(enquiry_routes())
        .merge(public_exhibition_routes())
        .merge(artist_routes())
        .merge(admin_routes())
}

/// 构建应用
///
/// 包含 API、存活探针、认证与可观测性中间件；就绪探针依赖数据库，由 main 挂载
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health_check))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// 存活探针：服务进程正常即返回 ok
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "kala-api"
    }))
}
