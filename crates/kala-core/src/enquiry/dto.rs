//! 咨询服务数据传输对象

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    ArtistContact, ArtistProfile, ClassType, Enquiry, EnquiryStatus, HIDDEN_CONTACT,
};

/// 提交咨询的输入
///
/// class_type 保留原始文本，由受理环节校验
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryInput {
    pub art_type: String,
    pub skill_level: String,
    pub duration: String,
    pub budget_range: String,
    pub class_type: String,
    pub user_location: Option<String>,
}

/// 咨询受理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquirySubmission {
    pub enquiry_id: Uuid,
    pub matched_count: usize,
    pub status: EnquiryStatus,
}

/// 咨询概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquirySummary {
    pub id: Uuid,
    pub art_type: String,
    pub skill_level: String,
    pub class_type: ClassType,
    pub budget_range: String,
    pub status: EnquiryStatus,
    pub contacts_revealed_count: usize,
    pub contacts_remaining: usize,
}

impl From<&Enquiry> for EnquirySummary {
    fn from(enquiry: &Enquiry) -> Self {
        Self {
            id: enquiry.id,
            art_type: enquiry.art_type.clone(),
            skill_level: enquiry.skill_level.clone(),
            class_type: enquiry.class_type,
            budget_range: enquiry.budget_range.clone(),
            status: enquiry.status,
            contacts_revealed_count: enquiry.contacts_revealed.len(),
            contacts_remaining: enquiry.contacts_remaining(),
        }
    }
}

/// 匹配到的艺术家
///
/// 未揭示时 phone/email 为掩码
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedArtist {
    pub id: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub categories: Vec<String>,
    pub teaching_rate: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_revealed: bool,
}

impl MatchedArtist {
    pub fn from_profile(artist: ArtistProfile, revealed: bool) -> Self {
        let (phone, email) = if revealed {
            (artist.phone, artist.email)
        } else {
            (
                Some(HIDDEN_CONTACT.to_string()),
                Some(HIDDEN_CONTACT.to_string()),
            )
        };

        Self {
            id: artist.id,
            full_name: artist.full_name,
            bio: artist.bio,
            avatar: artist.avatar,
            location: artist.location,
            categories: artist.categories,
            teaching_rate: artist.teaching_rate,
            phone,
            email,
            contact_revealed: revealed,
        }
    }
}

/// 匹配结果视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesView {
    pub enquiry: EnquirySummary,
    pub artists: Vec<MatchedArtist>,
}

/// 揭示成功后返回的联系方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedContact {
    #[serde(flatten)]
    pub contact: ArtistContact,
    pub contacts_remaining: usize,
}
