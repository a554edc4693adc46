//! 咨询受理
//!
//! 校验输入、执行匹配，并在限频窗口约束下原子写入新咨询。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kala_shared::config::EnquiryConfig;
use kala_shared::observability::metrics;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{EnquiryInput, EnquirySubmission};
use super::expiry::EnquiryExpiry;
use super::matcher::{ArtistMatcher, MatchCriteria};
use crate::error::{KalaError, Result};
use crate::models::{ClassType, Enquiry, NewEnquiry};
use crate::repository::{EnquiryRepositoryTrait, ProfileRepositoryTrait};

/// 咨询受理服务
pub struct EnquiryIntake {
    profile_repo: Arc<dyn ProfileRepositoryTrait>,
    enquiry_repo: Arc<dyn EnquiryRepositoryTrait>,
    matcher: ArtistMatcher,
    expiry: EnquiryExpiry,
    config: EnquiryConfig,
}

/// 去除首尾空白后要求非空
fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KalaError::Validation(format!("{} 不能为空", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// 校验后的咨询字段
struct ValidatedInput {
    art_type: String,
    skill_level: String,
    duration: String,
    budget_range: String,
    class_type: ClassType,
    user_location: Option<String>,
}

fn validate(input: &EnquiryInput) -> Result<ValidatedInput> {
    Ok(ValidatedInput {
        art_type: required("art_type", &input.art_type)?,
        skill_level: required("skill_level", &input.skill_level)?,
        duration: required("duration", &input.duration)?,
        budget_range: required("budget_range", &input.budget_range)?,
        class_type: input
            .class_type
            .trim()
            .parse()
            .map_err(KalaError::Validation)?,
        user_location: optional(input.user_location.as_deref()),
    })
}

impl EnquiryIntake {
    pub fn new(
        profile_repo: Arc<dyn ProfileRepositoryTrait>,
        enquiry_repo: Arc<dyn EnquiryRepositoryTrait>,
        config: EnquiryConfig,
    ) -> Self {
        Self {
            matcher: ArtistMatcher::new(profile_repo.clone()),
            expiry: EnquiryExpiry::new(enquiry_repo.clone()),
            profile_repo,
            enquiry_repo,
            config,
        }
    }

    /// 提交课程咨询
    pub async fn submit(&self, user_id: &str, input: EnquiryInput) -> Result<EnquirySubmission> {
        self.submit_at(user_id, input, Utc::now()).await
    }

    /// 以指定时间提交课程咨询
    ///
    /// 流程：
    /// 1. 校验字段
    /// 2. 执行匹配
    /// 3. 在限频窗口约束下写入（窗口内已有咨询返回 `RateLimited`）
    #[instrument(skip(self, input), fields(user_id = %user_id, class_type = %input.class_type))]
    pub async fn submit_at(
        &self,
        user_id: &str,
        input: EnquiryInput,
        now: DateTime<Utc>,
    ) -> Result<EnquirySubmission> {
        let fields = match validate(&input) {
            Ok(fields) => fields,
            Err(e) => {
                metrics::record_enquiry_submission(e.metric_label(), 0);
                return Err(e);
            }
        };

        let criteria = MatchCriteria {
            class_type: fields.class_type,
            budget_range: fields.budget_range.clone(),
            art_type: fields.art_type.clone(),
            user_location: fields.user_location.clone(),
        };
        let outcome = self.matcher.find_matches(&criteria).await?;

        let requester = self.profile_repo.get_requester(user_id).await?;
        let (user_name, user_email, profile_location) = match requester {
            Some(profile) => (profile.full_name, profile.email, profile.location),
            None => (None, None, None),
        };

        let new_enquiry = NewEnquiry {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            user_name,
            user_email,
            art_type: fields.art_type,
            skill_level: fields.skill_level,
            duration: fields.duration,
            budget_range: fields.budget_range,
            class_type: fields.class_type,
            // 仅用于展示，匹配只使用请求中的地区
            user_location: fields.user_location.or(profile_location),
            status: outcome.status,
            matched_artists: outcome.artist_ids(),
            created_at: now,
            expires_at: now + self.config.ttl(),
        };

        let window = self.config.rate_limit_window();
        let Some(enquiry) = self
            .enquiry_repo
            .insert_unless_recent(&new_enquiry, window)
            .await?
        else {
            warn!(user_id = %user_id, "窗口期内重复提交咨询");
            let err = KalaError::RateLimited {
                user_id: user_id.to_string(),
                window_days: self.config.rate_limit_window_days,
            };
            metrics::record_enquiry_submission(err.metric_label(), 0);
            return Err(err);
        };

        let matched_count = enquiry.matched_artists.len();
        metrics::record_enquiry_submission(enquiry.status.as_str(), matched_count);
        info!(
            enquiry_id = %enquiry.id,
            matched_count,
            status = enquiry.status.as_str(),
            "咨询已受理"
        );

        Ok(EnquirySubmission {
            enquiry_id: enquiry.id,
            matched_count,
            status: enquiry.status,
        })
    }

    /// 用户的全部咨询，按创建时间倒序
    ///
    /// 到期的记录在返回前完成过期转换
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Enquiry>> {
        self.list_for_user_at(user_id, Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn list_for_user_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Enquiry>> {
        let enquiries = self.enquiry_repo.list_by_user(user_id).await?;

        let mut refreshed = Vec::with_capacity(enquiries.len());
        for enquiry in enquiries {
            refreshed.push(self.expiry.refresh(enquiry, now).await?);
        }

        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::fixtures::artist;
    use crate::models::{EnquiryStatus, RequesterProfile};
    use crate::repository::{
        InMemoryEnquiryRepository, InMemoryProfileRepository, MockEnquiryRepositoryTrait,
        MockProfileRepositoryTrait,
    };
    use chrono::Duration;

    fn input() -> EnquiryInput {
        EnquiryInput {
            art_type: "Madhubani".to_string(),
            skill_level: "beginner".to_string(),
            duration: "1 month".to_string(),
            budget_range: "250-350".to_string(),
            class_type: "online".to_string(),
            user_location: None,
        }
    }

    fn setup() -> (EnquiryIntake, Arc<InMemoryProfileRepository>, Arc<InMemoryEnquiryRepository>) {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let enquiries = Arc::new(InMemoryEnquiryRepository::new());
        let intake = EnquiryIntake::new(
            profiles.clone(),
            enquiries.clone(),
            EnquiryConfig::default(),
        );
        (intake, profiles, enquiries)
    }

    #[tokio::test]
    async fn test_submit_matched() {
        let (intake, profiles, enquiries) = setup();
        profiles.insert_artist(artist("a1", 300.0));
        profiles.insert_artist(artist("a2", 260.0));
        profiles.insert_requester(RequesterProfile {
            id: "u1".to_string(),
            full_name: Some("Asha".to_string()),
            email: Some("asha@example.com".to_string()),
            location: Some("Pune".to_string()),
        });

        let now = Utc::now();
        let result = intake.submit_at("u1", input(), now).await.unwrap();
        assert_eq!(result.matched_count, 2);
        assert_eq!(result.status, EnquiryStatus::Matched);

        let stored = enquiries.get(result.enquiry_id).unwrap();
        assert_eq!(stored.matched_artists, vec!["a2".to_string(), "a1".to_string()]);
        assert!(stored.contacts_revealed.is_empty());
        assert_eq!(stored.expires_at, now + Duration::days(7));
        assert_eq!(stored.user_name.as_deref(), Some("Asha"));
        // 请求未提供地区时记录档案地区
        assert_eq!(stored.user_location.as_deref(), Some("Pune"));
    }

    #[tokio::test]
    async fn test_submit_without_matches_is_pending() {
        let (intake, _, _) = setup();
        let result = intake.submit_at("u1", input(), Utc::now()).await.unwrap();
        assert_eq!(result.matched_count, 0);
        assert_eq!(result.status, EnquiryStatus::Pending);
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let (intake, _, enquiries) = setup();

        let mut bad_class = input();
        bad_class.class_type = "hybrid".to_string();
        assert!(matches!(
            intake.submit_at("u1", bad_class, Utc::now()).await,
            Err(KalaError::Validation(_))
        ));

        let mut blank = input();
        blank.art_type = "   ".to_string();
        assert!(matches!(
            intake.submit_at("u1", blank, Utc::now()).await,
            Err(KalaError::Validation(_))
        ));

        assert_eq!(enquiries.count(), 0);
    }

    #[tokio::test]
    async fn test_submit_rate_limited_within_window() {
        let (intake, _, enquiries) = setup();
        let t0 = Utc::now();

        intake.submit_at("u1", input(), t0).await.unwrap();
        let err = intake
            .submit_at("u1", input(), t0 + Duration::days(10))
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::RateLimited { window_days: 30, .. }));

        intake
            .submit_at("u1", input(), t0 + Duration::days(31))
            .await
            .unwrap();
        assert_eq!(enquiries.count(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut profiles = MockProfileRepositoryTrait::new();
        profiles
            .expect_list_candidate_pool()
            .returning(|_| Ok(vec![]));
        profiles.expect_get_requester().returning(|_| Ok(None));

        let mut enquiries = MockEnquiryRepositoryTrait::new();
        enquiries
            .expect_insert_unless_recent()
            .returning(|_, _| Err(KalaError::Database(sqlx::Error::PoolTimedOut)));

        let intake = EnquiryIntake::new(
            Arc::new(profiles),
            Arc::new(enquiries),
            EnquiryConfig::default(),
        );
        let err = intake.submit_at("u1", input(), Utc::now()).await.unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_list_for_user_applies_expiry() {
        let (intake, _, _) = setup();
        let t0 = Utc::now();
        intake.submit_at("u1", input(), t0).await.unwrap();

        let fresh = intake.list_for_user_at("u1", t0).await.unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].status, EnquiryStatus::Pending);

        let later = intake
            .list_for_user_at("u1", t0 + Duration::days(8))
            .await
            .unwrap();
        assert_eq!(later[0].status, EnquiryStatus::Expired);
        assert!(intake.list_for_user_at("u2", t0).await.unwrap().is_empty());
    }
}
