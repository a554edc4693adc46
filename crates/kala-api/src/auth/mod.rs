//! 认证模块

mod jwt;

pub use jwt::{AuthUser, Claims, JwtConfig, JwtManager, UserMetadata};
