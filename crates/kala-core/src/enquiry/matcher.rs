//! 艺术家匹配器
//!
//! 从候选池中按授课方式、课时费区间、艺术类别依次过滤，
//! 按课时费升序（同价按艺术家 ID 升序）排序后取前 3 位。
//!
//! 过滤逻辑是纯函数 [`select`]，仓储下推的条件不影响结果。

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::Result;
use crate::models::{ArtistProfile, ClassType, EnquiryStatus, MAX_MATCHED_ARTISTS};
use crate::repository::ProfileRepositoryTrait;

/// 匹配条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    pub class_type: ClassType,
    pub budget_range: String,
    pub art_type: String,
    /// 线下课程的地区过滤，空串视为未提供
    pub user_location: Option<String>,
}

/// 匹配结果
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub artists: Vec<ArtistProfile>,
    pub status: EnquiryStatus,
}

impl MatchOutcome {
    pub fn artist_ids(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.id.clone()).collect()
    }
}

/// 课时费区间（闭区间）
///
/// 线上课程没有 500-1000 档，未登记的区间不做课时费过滤
pub fn rate_bounds(class_type: ClassType, budget_range: &str) -> Option<(f64, f64)> {
    match (class_type, budget_range) {
        (_, "250-350") => Some((250.0, 350.0)),
        (_, "350-500") => Some((350.0, 500.0)),
        (ClassType::Offline, "500-1000") => Some((500.0, 1000.0)),
        _ => None,
    }
}

fn matches_mode(artist: &ArtistProfile, criteria: &MatchCriteria) -> bool {
    match criteria.class_type {
        ClassType::Online => artist.teaches_online,
        ClassType::Offline => {
            if !artist.teaches_offline {
                return false;
            }
            match criteria.user_location.as_deref().map(str::trim) {
                Some(wanted) if !wanted.is_empty() => artist
                    .location
                    .as_deref()
                    .is_some_and(|loc| loc.to_lowercase().contains(&wanted.to_lowercase())),
                _ => true,
            }
        }
    }
}

fn matches_rate(artist: &ArtistProfile, bounds: Option<(f64, f64)>) -> bool {
    match (bounds, artist.teaching_rate) {
        (None, _) => true,
        (Some((min, max)), Some(rate)) => rate >= min && rate <= max,
        (Some(_), None) => false,
    }
}

/// 纯匹配函数
///
/// 对同一候选池与条件总是返回相同结果
pub fn select(criteria: &MatchCriteria, pool: &[ArtistProfile]) -> MatchOutcome {
    let bounds = rate_bounds(criteria.class_type, &criteria.budget_range);

    let mut artists: Vec<ArtistProfile> = pool
        .iter()
        .filter(|a| a.is_candidate())
        .filter(|a| matches_mode(a, criteria))
        .filter(|a| matches_rate(a, bounds))
        .filter(|a| a.categories.iter().any(|c| c == &criteria.art_type))
        .cloned()
        .collect();

    artists.sort_by(|a, b| {
        let rate_a = a.teaching_rate.unwrap_or(f64::MAX);
        let rate_b = b.teaching_rate.unwrap_or(f64::MAX);
        rate_a.total_cmp(&rate_b).then_with(|| a.id.cmp(&b.id))
    });
    artists.truncate(MAX_MATCHED_ARTISTS);

    let status = if artists.is_empty() {
        EnquiryStatus::Pending
    } else {
        EnquiryStatus::Matched
    };

    MatchOutcome { artists, status }
}

/// 艺术家匹配服务
pub struct ArtistMatcher {
    profile_repo: Arc<dyn ProfileRepositoryTrait>,
}

impl ArtistMatcher {
    pub fn new(profile_repo: Arc<dyn ProfileRepositoryTrait>) -> Self {
        Self { profile_repo }
    }

    /// 读取候选池并执行匹配
    #[instrument(skip(self), fields(class_type = %criteria.class_type, art_type = %criteria.art_type))]
    pub async fn find_matches(&self, criteria: &MatchCriteria) -> Result<MatchOutcome> {
        let pool = self
            .profile_repo
            .list_candidate_pool(criteria.class_type)
            .await?;

        let outcome = select(criteria, &pool);
        debug!(
            pool_size = pool.len(),
            matched = outcome.artists.len(),
            "艺术家匹配完成"
        );

        Ok(outcome)
    }
}
