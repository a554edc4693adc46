//! HTTP 请求处理器

pub mod admin;
pub mod enquiry;
pub mod exhibition;
