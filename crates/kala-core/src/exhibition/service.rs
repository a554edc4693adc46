//! 展览服务
//!
//! 艺术家提交展览（费用由计费器计算），公开浏览已审核展览，管理员审核。

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use kala_shared::observability::metrics;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::fee_calculator::{self, FeeBreakdown};
use crate::error::{KalaError, Result};
use crate::models::{Exhibition, ExhibitionStatus, ExhibitionType, NewExhibition};
use crate::repository::ExhibitionRepositoryTrait;

/// 创建展览的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionInput {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub artwork_ids: Vec<String>,
    /// 缺省为 Kalakanksh
    pub exhibition_type: Option<String>,
    #[serde(default)]
    pub voluntary_platform_fee: f64,
}

/// 审核结果
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    Approved(Exhibition),
    Rejected(Uuid),
}

/// 公开列表的状态筛选
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublicFilter {
    #[default]
    All,
    Active,
    Archived,
}

impl PublicFilter {
    fn status(self) -> Option<ExhibitionStatus> {
        match self {
            Self::All => None,
            Self::Active => Some(ExhibitionStatus::Active),
            Self::Archived => Some(ExhibitionStatus::Archived),
        }
    }
}

/// 解析档位名称，缺省为 Kalakanksh
pub fn parse_tier(value: Option<&str>) -> Result<ExhibitionType> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(ExhibitionType::default()),
        Some(name) => name.parse().map_err(KalaError::Validation),
    }
}

/// 展览服务
pub struct ExhibitionService {
    exhibition_repo: Arc<dyn ExhibitionRepositoryTrait>,
}

impl ExhibitionService {
    pub fn new(exhibition_repo: Arc<dyn ExhibitionRepositoryTrait>) -> Self {
        Self { exhibition_repo }
    }

    /// 报价（公开接口）
    pub fn quote(&self, tier: ExhibitionType, artwork_count: usize) -> Result<FeeBreakdown> {
        fee_calculator::calculate(tier, artwork_count)
    }

    /// 艺术家提交展览
    pub async fn create(&self, artist_id: &str, input: ExhibitionInput) -> Result<Exhibition> {
        self.create_at(artist_id, input, Utc::now()).await
    }

    #[instrument(skip(self, input), fields(artist_id = %artist_id, artworks = input.artwork_ids.len()))]
    pub async fn create_at(
        &self,
        artist_id: &str,
        input: ExhibitionInput,
        now: DateTime<Utc>,
    ) -> Result<Exhibition> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(KalaError::Validation("展览名称不能为空".to_string()));
        }
        if input.end_date < input.start_date {
            return Err(KalaError::Validation("结束日期不能早于开始日期".to_string()));
        }
        if input.voluntary_platform_fee.is_nan() || input.voluntary_platform_fee < 0.0 {
            return Err(KalaError::Validation("平台费不能为负数".to_string()));
        }
        let unique: HashSet<&String> = input.artwork_ids.iter().collect();
        if unique.len() != input.artwork_ids.len() {
            return Err(KalaError::Validation("作品 ID 重复".to_string()));
        }

        let tier = parse_tier(input.exhibition_type.as_deref())?;
        let fee = fee_calculator::calculate(tier, input.artwork_ids.len())?;

        let new_exhibition = NewExhibition {
            id: Uuid::now_v7(),
            artist_id: artist_id.to_string(),
            name: name.to_string(),
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            exhibition_type: tier,
            artwork_ids: input.artwork_ids,
            total_fee: fee.total_fee,
            additional_artworks: fee.additional_artworks,
            additional_artwork_fee: fee.additional_artwork_fee,
            days_entitled: fee.days_entitled,
            max_base_artworks: fee.max_base_artworks,
            voluntary_platform_fee: input.voluntary_platform_fee,
            created_at: now,
        };

        let exhibition = self.exhibition_repo.create(&new_exhibition).await?;

        metrics::record_exhibition_created(tier.as_str(), exhibition.total_fee);
        info!(
            exhibition_id = %exhibition.id,
            tier = %tier,
            total_fee = exhibition.total_fee,
            "展览已提交，等待审核"
        );

        Ok(exhibition)
    }

    pub async fn list_for_artist(&self, artist_id: &str) -> Result<Vec<Exhibition>> {
        self.exhibition_repo.list_by_artist(artist_id).await
    }

    pub async fn list_public(&self, filter: PublicFilter) -> Result<Vec<Exhibition>> {
        self.exhibition_repo.list_public(filter.status()).await
    }

    pub async fn list_pending(&self) -> Result<Vec<Exhibition>> {
        self.exhibition_repo.list_pending().await
    }

    /// 管理员审核
    ///
    /// 通过则上线，拒绝则删除
    #[instrument(skip(self))]
    pub async fn approve(&self, id: Uuid, approved: bool) -> Result<ApprovalOutcome> {
        if approved {
            let exhibition = self
                .exhibition_repo
                .approve(id)
                .await?
                .ok_or(KalaError::ExhibitionNotFound(id))?;
            info!("展览审核通过");
            Ok(ApprovalOutcome::Approved(exhibition))
        } else {
            if !self.exhibition_repo.delete(id).await? {
                return Err(KalaError::ExhibitionNotFound(id));
            }
            info!("展览审核未通过，已删除");
            Ok(ApprovalOutcome::Rejected(id))
        }
    }
}
