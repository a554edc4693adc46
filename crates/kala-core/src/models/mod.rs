//! 领域模型
//!
//! 包含艺术家档案、课程咨询和展览的实体定义

pub mod enquiry;
pub mod enums;
pub mod exhibition;
pub mod profile;

// 重新导出常用类型
pub use enquiry::{
    CONTACT_REVEAL_QUOTA, Enquiry, HIDDEN_CONTACT, MAX_MATCHED_ARTISTS, NewEnquiry,
    RevealRejection,
};
pub use enums::{ClassType, EnquiryStatus, ExhibitionStatus, ExhibitionType, Role};
pub use exhibition::{Exhibition, NewExhibition};
pub use profile::{ArtistContact, ArtistProfile, RequesterProfile};
