//! 展览计费器
//!
//! 纯函数：档位 + 作品数量 → 费用明细，并校验容量上限

use serde::{Deserialize, Serialize};

use crate::error::{KalaError, Result};
use crate::models::ExhibitionType;

/// 档位配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierConfig {
    pub base_fee: i64,
    pub days: i32,
    /// 基础费用包含的作品数
    pub max_base_artworks: usize,
    /// 作品数量硬上限
    pub max_total_artworks: usize,
    /// 超出基础数量后每件加收，0 表示不加收
    pub extra_fee_per_artwork: i64,
}

impl ExhibitionType {
    pub const fn tier_config(&self) -> TierConfig {
        match self {
            Self::Kalakanksh => TierConfig {
                base_fee: 1000,
                days: 3,
                max_base_artworks: 10,
                max_total_artworks: 15,
                extra_fee_per_artwork: 100,
            },
            Self::Kalahruday => TierConfig {
                base_fee: 2000,
                days: 5,
                max_base_artworks: 20,
                max_total_artworks: 20,
                extra_fee_per_artwork: 0,
            },
            Self::KalaDeeksh => TierConfig {
                base_fee: 3000,
                days: 10,
                max_base_artworks: 30,
                max_total_artworks: 30,
                extra_fee_per_artwork: 0,
            },
        }
    }
}

/// 费用明细
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub exhibition_type: ExhibitionType,
    pub total_fee: i64,
    pub additional_artworks: i32,
    pub additional_artwork_fee: i64,
    pub days_entitled: i32,
    pub max_base_artworks: i32,
}

/// 计算展览费用
///
/// 超过档位作品上限时返回 `CapacityExceeded`
pub fn calculate(tier: ExhibitionType, artwork_count: usize) -> Result<FeeBreakdown> {
    let config = tier.tier_config();

    if artwork_count > config.max_total_artworks {
        return Err(KalaError::CapacityExceeded {
            tier,
            max_total: config.max_total_artworks,
            requested: artwork_count,
        });
    }

    let additional = if config.extra_fee_per_artwork > 0 {
        artwork_count.saturating_sub(config.max_base_artworks)
    } else {
        0
    };
    let additional_fee = additional as i64 * config.extra_fee_per_artwork;

    Ok(FeeBreakdown {
        exhibition_type: tier,
        total_fee: config.base_fee + additional_fee,
        additional_artworks: additional as i32,
        additional_artwork_fee: additional_fee,
        days_entitled: config.days,
        max_base_artworks: config.max_base_artworks as i32,
    })
}
