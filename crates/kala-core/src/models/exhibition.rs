//! 展览实体

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ExhibitionStatus, ExhibitionType};

/// 展览
///
/// 费用字段在创建时由计费器计算并固化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exhibition {
    pub id: Uuid,
    pub artist_id: String,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub exhibition_type: ExhibitionType,
    pub artwork_ids: Vec<String>,
    pub total_fee: i64,
    pub additional_artworks: i32,
    pub additional_artwork_fee: i64,
    pub days_entitled: i32,
    pub max_base_artworks: i32,
    pub status: ExhibitionStatus,
    pub is_approved: bool,
    /// 自愿支付的平台费
    pub voluntary_platform_fee: f64,
    pub created_at: DateTime<Utc>,
}

/// 待写入的新展览
#[derive(Debug, Clone, PartialEq)]
pub struct NewExhibition {
    pub id: Uuid,
    pub artist_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub exhibition_type: ExhibitionType,
    pub artwork_ids: Vec<String>,
    pub total_fee: i64,
    pub additional_artworks: i32,
    pub additional_artwork_fee: i64,
    pub days_entitled: i32,
    pub max_base_artworks: i32,
    pub voluntary_platform_fee: f64,
    pub created_at: DateTime<Utc>,
}

impl NewExhibition {
    /// 新展览一律待审核
    pub fn into_exhibition(self) -> Exhibition {
        Exhibition {
            id: self.id,
            artist_id: self.artist_id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            exhibition_type: self.exhibition_type,
            artwork_ids: self.artwork_ids,
            total_fee: self.total_fee,
            additional_artworks: self.additional_artworks,
            additional_artwork_fee: self.additional_artwork_fee,
            days_entitled: self.days_entitled,
            max_base_artworks: self.max_base_artworks,
            status: ExhibitionStatus::Upcoming,
            is_approved: false,
            voluntary_platform_fee: self.voluntary_platform_fee,
            created_at: self.created_at,
        }
    }
}
