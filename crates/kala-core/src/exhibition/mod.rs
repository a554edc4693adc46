//! 展览模块
//!
//! - `fee_calculator`: 档位计费与容量校验
//! - `service`: 展览提交、浏览与审核

pub mod fee_calculator;
mod service;

pub use fee_calculator::{FeeBreakdown, TierConfig, calculate};
pub use service::{ApprovalOutcome, ExhibitionInput, ExhibitionService, PublicFilter, parse_tier};
