//! HTTP 中间件

mod auth;
mod role;

pub use auth::auth_middleware;
pub use role::{is_allowed, require_roles};
