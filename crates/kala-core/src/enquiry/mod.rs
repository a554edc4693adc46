//! 课程咨询引擎
//!
//! - `intake`: 咨询受理与限频
//! - `matcher`: 艺术家匹配
//! - `reveal_gate`: 联系方式揭示与匹配结果查看
//! - `expiry`: 惰性过期

pub mod dto;
mod expiry;
mod intake;
pub mod matcher;
mod reveal_gate;

pub use dto::{
    EnquiryInput, EnquirySubmission, EnquirySummary, MatchedArtist, MatchesView, RevealedContact,
};
pub use expiry::EnquiryExpiry;
pub use intake::EnquiryIntake;
pub use matcher::{ArtistMatcher, MatchCriteria, MatchOutcome};
pub use reveal_gate::ContactRevealGate;
