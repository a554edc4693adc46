//! HTTP 层错误类型定义
//!
//! 将核心业务错误映射为 HTTP 状态码和统一响应体

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kala_core::KalaError;
use serde_json::json;

/// HTTP 层错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("禁止访问: {0}")]
    Forbidden(String),

    // 请求参数错误（核心层之外的校验，如 validator）
    #[error("参数验证失败: {0}")]
    Validation(String),

    // 核心业务错误
    #[error(transparent)]
    Core(#[from] KalaError),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Core(err) => match err {
                KalaError::Validation(_) => StatusCode::BAD_REQUEST,
                KalaError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                KalaError::EnquiryNotFound(_) | KalaError::ExhibitionNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                KalaError::QuotaExceeded { .. }
                | KalaError::NotMatched(_)
                | KalaError::AlreadyRevealed(_) => StatusCode::CONFLICT,
                KalaError::CapacityExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                KalaError::Expired(_) => StatusCode::GONE,
                KalaError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
                KalaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Core(err) => err.error_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Core(KalaError::Database(e)) => {
                tracing::error!(error = %e, "数据库操作失败");
                "存储服务暂不可用，请稍后重试".to_string()
            }
            Self::Core(KalaError::Internal(e)) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// HTTP 层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;
