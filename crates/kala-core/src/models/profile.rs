//! 用户档案实体
//!
//! 档案由平台其他模块维护，咨询引擎只读

use serde::{Deserialize, Serialize};

use super::enums::Role;

/// 艺术家档案
///
/// 包含匹配所需的授课信息和敏感联系方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    pub id: String,
    pub role: Role,
    #[sqlx(default)]
    pub full_name: Option<String>,
    #[sqlx(default)]
    pub bio: Option<String>,
    #[sqlx(default)]
    pub avatar: Option<String>,
    /// 所在地区，线下匹配时做子串比对
    #[sqlx(default)]
    pub location: Option<String>,
    /// 擅长的艺术类别
    pub categories: Vec<String>,
    /// 每课时费用，为空的艺术家不参与匹配
    #[sqlx(default)]
    pub teaching_rate: Option<f64>,
    pub teaches_online: bool,
    pub teaches_offline: bool,
    pub is_approved: bool,
    pub is_active: bool,
    /// 联系电话（敏感）
    #[sqlx(default)]
    pub phone: Option<String>,
    /// 联系邮箱（敏感）
    #[sqlx(default)]
    pub email: Option<String>,
}

impl ArtistProfile {
    /// 是否进入候选池
    pub fn is_candidate(&self) -> bool {
        self.role == Role::Artist
            && self.is_approved
            && self.is_active
            && self.teaching_rate.is_some()
    }

    /// 提取联系方式
    pub fn contact(&self) -> ArtistContact {
        ArtistContact {
            artist_id: self.id.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

/// 艺术家联系方式
///
/// 仅在揭示成功后返回给咨询发起人
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArtistContact {
    #[sqlx(rename = "id")]
    pub artist_id: String,
    #[sqlx(default)]
    pub full_name: Option<String>,
    #[sqlx(default)]
    pub phone: Option<String>,
    #[sqlx(default)]
    pub email: Option<String>,
}

/// 咨询发起人档案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RequesterProfile {
    pub id: String,
    #[sqlx(default)]
    pub full_name: Option<String>,
    #[sqlx(default)]
    pub email: Option<String>,
    #[sqlx(default)]
    pub location: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// 构造一个可进入候选池的艺术家
    pub fn artist(id: &str, rate: f64) -> ArtistProfile {
        ArtistProfile {
            id: id.to_string(),
            role: Role::Artist,
            full_name: Some(format!("Artist {}", id)),
            bio: None,
            avatar: None,
            location: Some("Mumbai, Maharashtra".to_string()),
            categories: vec!["Madhubani".to_string()],
            teaching_rate: Some(rate),
            teaches_online: true,
            teaches_offline: true,
            is_approved: true,
            is_active: true,
            phone: Some(format!("+91-98{}", id)),
            email: Some(format!("{}@example.com", id)),
        }
    }
}
