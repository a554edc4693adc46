//! 枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 用户角色
///
/// 来自身份提供方签发的令牌，同时写在 profiles 表中
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum Role {
    /// 普通用户
    #[default]
    User,
    /// 艺术家
    Artist,
    /// 平台管理员，通过所有角色校验
    Admin,
    LeadChitrakar,
    Kalakar,
}

impl Role {
    /// 从令牌声明解析角色，未知值降级为普通用户
    pub fn from_claim(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Artist => "artist",
            Self::Admin => "admin",
            Self::LeadChitrakar => "lead_chitrakar",
            Self::Kalakar => "kalakar",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "artist" => Ok(Self::Artist),
            "admin" => Ok(Self::Admin),
            "lead_chitrakar" => Ok(Self::LeadChitrakar),
            "kalakar" => Ok(Self::Kalakar),
            other => Err(format!("未知角色: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 授课方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ClassType {
    /// 线上授课
    Online,
    /// 线下授课，匹配时可按地区过滤
    Offline,
}

impl ClassType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for ClassType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(format!("class_type 必须为 online 或 offline，实际为 {}", other)),
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 咨询状态
///
/// expired 为终态，只能由惰性过期检查写入
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum EnquiryStatus {
    /// 没有匹配到艺术家
    #[default]
    Pending,
    /// 至少匹配到一位艺术家
    Matched,
    /// 已过期
    Expired,
}

impl EnquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Expired => "expired",
        }
    }
}

/// 展览档位
///
/// 决定基础费用、展期和作品数量上限
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum ExhibitionType {
    #[default]
    Kalakanksh,
    Kalahruday,
    KalaDeeksh,
}

impl ExhibitionType {
    pub const ALL: [ExhibitionType; 3] = [Self::Kalakanksh, Self::Kalahruday, Self::KalaDeeksh];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kalakanksh => "Kalakanksh",
            Self::Kalahruday => "Kalahruday",
            Self::KalaDeeksh => "KalaDeeksh",
        }
    }
}

impl FromStr for ExhibitionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("未知展览档位: {}", s))
    }
}

impl fmt::Display for ExhibitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 展览状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ExhibitionStatus {
    /// 待审核或未开始
    #[default]
    Upcoming,
    /// 审核通过，展出中
    Active,
    /// 已归档
    Archived,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_claim() {
        assert_eq!(Role::from_claim(Some("artist")), Role::Artist);
        assert_eq!(Role::from_claim(Some("lead_chitrakar")), Role::LeadChitrakar);
        assert_eq!(Role::from_claim(Some("superuser")), Role::User);
        assert_eq!(Role::from_claim(None), Role::User);
    }

    #[test]
    fn test_class_type_parse() {
        assert_eq!("online".parse::<ClassType>().unwrap(), ClassType::Online);
        assert_eq!("offline".parse::<ClassType>().unwrap(), ClassType::Offline);
        assert!("hybrid".parse::<ClassType>().is_err());
        assert!("Online".parse::<ClassType>().is_err());
    }

    #[test]
    fn test_exhibition_type_serde_keeps_tier_names() {
        let json = serde_json::to_string(&ExhibitionType::KalaDeeksh).unwrap();
        assert_eq!(json, "\"KalaDeeksh\"");

        let tier: ExhibitionType = serde_json::from_str("\"Kalahruday\"").unwrap();
        assert_eq!(tier, ExhibitionType::Kalahruday);
        assert_eq!("Kalakanksh".parse::<ExhibitionType>().unwrap(), ExhibitionType::Kalakanksh);
        assert!("kalakanksh".parse::<ExhibitionType>().is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&EnquiryStatus::Matched).unwrap(), "\"matched\"");
        assert_eq!(serde_json::to_string(&ExhibitionStatus::Archived).unwrap(), "\"archived\"");
    }
}
