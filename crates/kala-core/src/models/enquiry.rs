//! 课程咨询实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ClassType, EnquiryStatus};

/// 单条咨询最多匹配的艺术家数
pub const MAX_MATCHED_ARTISTS: usize = 3;

/// 单条咨询最多可揭示的联系方式数
pub const CONTACT_REVEAL_QUOTA: usize = 3;

/// 未揭示联系方式的掩码
pub const HIDDEN_CONTACT: &str = "***HIDDEN***";

/// 课程咨询
///
/// matched_artists 在创建时确定，contacts_revealed 只追加不删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub id: Uuid,
    /// 咨询发起人
    pub user_id: String,
    #[sqlx(default)]
    pub user_name: Option<String>,
    #[sqlx(default)]
    pub user_email: Option<String>,
    pub art_type: String,
    pub skill_level: String,
    pub duration: String,
    pub budget_range: String,
    pub class_type: ClassType,
    #[sqlx(default)]
    pub user_location: Option<String>,
    pub status: EnquiryStatus,
    /// 按匹配顺序排列的艺术家 ID
    pub matched_artists: Vec<String>,
    /// 已揭示联系方式的艺术家 ID
    pub contacts_revealed: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// 揭示被拒绝的原因
///
/// 判定顺序固定：额度 → 匹配关系 → 重复
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealRejection {
    QuotaExceeded,
    NotMatched,
    AlreadyRevealed,
}

impl Enquiry {
    /// 到达截止时间后即视为过期（不论是否已持久化）
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == EnquiryStatus::Expired || now > self.expires_at
    }

    /// 是否需要写入过期状态
    pub fn needs_expiry(&self, now: DateTime<Utc>) -> bool {
        self.status != EnquiryStatus::Expired && now > self.expires_at
    }

    pub fn is_revealed(&self, artist_id: &str) -> bool {
        self.contacts_revealed.iter().any(|id| id == artist_id)
    }

    pub fn is_matched(&self, artist_id: &str) -> bool {
        self.matched_artists.iter().any(|id| id == artist_id)
    }

    /// 剩余可揭示次数
    pub fn contacts_remaining(&self) -> usize {
        CONTACT_REVEAL_QUOTA.saturating_sub(self.contacts_revealed.len())
    }

    /// 检查能否揭示指定艺术家（不含过期检查）
    pub fn reveal_rejection(&self, artist_id: &str) -> Option<RevealRejection> {
        if self.contacts_revealed.len() >= CONTACT_REVEAL_QUOTA {
            Some(RevealRejection::QuotaExceeded)
        } else if !self.is_matched(artist_id) {
            Some(RevealRejection::NotMatched)
        } else if self.is_revealed(artist_id) {
            Some(RevealRejection::AlreadyRevealed)
        } else {
            None
        }
    }
}

/// 待写入的新咨询
#[derive(Debug, Clone, PartialEq)]
pub struct NewEnquiry {
    pub id: Uuid,
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub art_type: String,
    pub skill_level: String,
    pub duration: String,
    pub budget_range: String,
    pub class_type: ClassType,
    pub user_location: Option<String>,
    pub status: EnquiryStatus,
    pub matched_artists: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewEnquiry {
    /// 生成持久化后的实体（内存仓储使用）
    pub fn into_enquiry(self) -> Enquiry {
        Enquiry {
            id: self.id,
            user_id: self.user_id,
            user_name: self.user_name,
            user_email: self.user_email,
            art_type: self.art_type,
            skill_level: self.skill_level,
            duration: self.duration,
            budget_range: self.budget_range,
            class_type: self.class_type,
            user_location: self.user_location,
            status: self.status,
            matched_artists: self.matched_artists,
            contacts_revealed: Vec::new(),
            created_at: self.created_at,
            updated_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}
