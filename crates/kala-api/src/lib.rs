//! Kala 平台 HTTP 服务
//!
//! 提供课程咨询匹配、联系方式揭示和展览相关的 REST API。
//!
//! ## 模块结构
//!
//! - `auth`: JWT 校验
//! - `middleware`: 认证与角色检查
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型与 HTTP 映射
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use dto::ApiResponse;
pub use error::{ApiError, Result};
pub use state::AppState;
