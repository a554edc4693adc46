//! Kala 课程咨询与展览核心
//!
//! 平台中唯一带有决策逻辑和并发风险的子系统。
//!
//! ## 核心功能
//!
//! - **咨询受理**：校验输入，按用户限频（滚动 30 天窗口一次）
//! - **艺术家匹配**：授课方式、课时费区间、艺术类别过滤，按课时费排序取前 3 位
//! - **联系方式揭示**：每条咨询最多揭示 3 位，原子条件追加
//! - **惰性过期**：读取时检查有效期并写入终态
//! - **展览计费**：按档位计算费用并校验作品数量上限
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 仓储接口与 PostgreSQL/内存实现
//! - `enquiry`: 咨询引擎
//! - `exhibition`: 展览计费与服务

pub mod enquiry;
pub mod error;
pub mod exhibition;
pub mod models;
pub mod repository;

pub use enquiry::{
    ArtistMatcher, ContactRevealGate, EnquiryExpiry, EnquiryInput, EnquiryIntake,
    EnquirySubmission, MatchCriteria, MatchOutcome, MatchesView, RevealedContact,
};
pub use error::{KalaError, Result};
pub use exhibition::{ApprovalOutcome, ExhibitionInput, ExhibitionService, FeeBreakdown, PublicFilter};
pub use models::*;
pub use repository::{
    EnquiryRepository, EnquiryRepositoryTrait, ExhibitionRepository, ExhibitionRepositoryTrait,
    InMemoryEnquiryRepository, InMemoryExhibitionRepository, InMemoryProfileRepository,
    ProfileRepository, ProfileRepositoryTrait,
};
