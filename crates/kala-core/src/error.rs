//! 核心业务错误类型
//!
//! 定义咨询匹配、联系方式揭示与展览计费的业务错误和存储错误

use thiserror::Error;
use uuid::Uuid;

use crate::models::ExhibitionType;

/// 核心业务错误类型
#[derive(Debug, Error)]
pub enum KalaError {
    // === 请求校验 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 咨询相关错误 ===
    #[error("咨询提交过于频繁: user_id={user_id}, {window_days} 天内仅可提交一次")]
    RateLimited { user_id: String, window_days: i64 },

    #[error("咨询不存在: {0}")]
    EnquiryNotFound(Uuid),

    #[error("咨询已过期: {0}")]
    Expired(Uuid),

    #[error("联系方式揭示次数已用完: enquiry_id={enquiry_id}, limit={limit}")]
    QuotaExceeded { enquiry_id: Uuid, limit: usize },

    #[error("艺术家不在匹配列表中: artist_id={0}")]
    NotMatched(String),

    #[error("该艺术家联系方式已揭示: artist_id={0}")]
    AlreadyRevealed(String),

    // === 展览相关错误 ===
    #[error("展览不存在: {0}")]
    ExhibitionNotFound(Uuid),

    #[error("{tier} 最多允许 {max_total} 件作品，实际 {requested} 件")]
    CapacityExceeded {
        tier: ExhibitionType,
        max_total: usize,
        requested: usize,
    },

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 核心服务 Result 类型别名
pub type Result<T> = std::result::Result<T, KalaError>;

impl KalaError {
    /// 检查是否为可重试的错误
    ///
    /// 存储故障原样上抛，是否重试由调用方决定
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::EnquiryNotFound(_) => "ENQUIRY_NOT_FOUND",
            Self::Expired(_) => "ENQUIRY_EXPIRED",
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::NotMatched(_) => "NOT_MATCHED",
            Self::AlreadyRevealed(_) => "ALREADY_REVEALED",
            Self::ExhibitionNotFound(_) => "EXHIBITION_NOT_FOUND",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::Database(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 指标标签使用的短名称
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid",
            Self::RateLimited { .. } => "rate_limited",
            Self::EnquiryNotFound(_) | Self::ExhibitionNotFound(_) => "not_found",
            Self::Expired(_) => "expired",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::NotMatched(_) => "not_matched",
            Self::AlreadyRevealed(_) => "already_revealed",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Database(_) => "storage_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}
