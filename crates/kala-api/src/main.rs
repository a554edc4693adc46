//! Kala 平台 HTTP 服务入口

use std::sync::Arc;

use anyhow::bail;
use axum::{
    Json, Router, extract::Request, http::HeaderValue, middleware, middleware::Next,
    response::Response, routing::get,
};
use kala_api::{
    auth::{JwtConfig, JwtManager},
    routes,
    state::AppState,
};
use kala_core::{EnquiryRepository, ExhibitionRepository, ProfileRepository};
use kala_shared::{config::AppConfig, database::Database, observability};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// 开发环境默认密钥
const DEV_JWT_SECRET: &str = "kala-dev-secret-change-in-production";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("kala-api")?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!("Starting kala-api on {}", config.server_addr());

    let db = Database::connect(&config.database).await?;
    if config.database.run_migrations {
        db.run_migrations().await?;
        info!("Database migrations applied");
    }

    // 生产环境必须配置密钥
    let jwt_secret = match config.auth.jwt_secret.clone() {
        Some(secret) if !secret.is_empty() => secret,
        _ if config.is_production() => bail!("KALA_AUTH__JWT_SECRET must be set in production"),
        _ => {
            warn!("Using default JWT secret - set KALA_AUTH__JWT_SECRET for production");
            DEV_JWT_SECRET.to_string()
        }
    };
    let jwt_manager = JwtManager::new(JwtConfig {
        secret: jwt_secret,
        audience: config.auth.audience.clone(),
    });

    let pool = db.pool().clone();
    let state = AppState::new(
        Arc::new(ProfileRepository::new(pool.clone())),
        Arc::new(EnquiryRepository::new(pool.clone())),
        Arc::new(ExhibitionRepository::new(pool)),
        config.enquiry.clone(),
        jwt_manager,
    );

    let app: Router = routes::app(state)
        .route(
            "/ready",
            get({
                let db_for_ready = db.clone();
                move || readiness_check(db_for_ready.clone())
            }),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer(&config));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 收到 SIGTERM 或 Ctrl+C 后停止接收新连接，等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// CORS 配置
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let allowed_origins = config.server.cors_origins.trim();

    if allowed_origins == "*" {
        if config.is_production() {
            warn!("cors_origins=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// 为所有响应注入 HTTP 安全头
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert("x-xss-protection", HeaderValue::from_static("0"));
    response
}

/// 监听关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 就绪探针：检查数据库连接是否可用
async fn readiness_check(db: Database) -> Json<serde_json::Value> {
    let db_ok = db.health_check().await.is_ok();

    Json(serde_json::json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "service": "kala-api",
        "checks": {
            "database": if db_ok { "ok" } else { "fail" }
        }
    }))
}
