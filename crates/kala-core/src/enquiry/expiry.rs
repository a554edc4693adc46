//! 咨询惰性过期
//!
//! 没有后台任务：每个读取路径先比较当前时间与 expires_at，
//! 到期则条件写入 expired 状态，再继续后续处理。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kala_shared::observability::metrics;
use tracing::{info, instrument};

use crate::error::{KalaError, Result};
use crate::models::{Enquiry, EnquiryStatus};
use crate::repository::EnquiryRepositoryTrait;

/// 惰性过期处理
pub struct EnquiryExpiry {
    enquiry_repo: Arc<dyn EnquiryRepositoryTrait>,
}

impl EnquiryExpiry {
    pub fn new(enquiry_repo: Arc<dyn EnquiryRepositoryTrait>) -> Self {
        Self { enquiry_repo }
    }

    /// 到期则写入过期状态，返回最新视图
    ///
    /// 并发调用时只有一个调用方完成转换，其他调用方看到的结果相同
    #[instrument(skip(self, enquiry), fields(enquiry_id = %enquiry.id))]
    pub async fn refresh(&self, mut enquiry: Enquiry, now: DateTime<Utc>) -> Result<Enquiry> {
        if enquiry.needs_expiry(now) {
            if self.enquiry_repo.mark_expired(enquiry.id, now).await? {
                metrics::record_enquiry_expired();
                info!(expires_at = %enquiry.expires_at, "咨询已过期");
            }
            enquiry.status = EnquiryStatus::Expired;
            enquiry.updated_at = now;
        }

        Ok(enquiry)
    }

    /// 要求咨询仍然有效
    ///
    /// 完成过期转换的这次读取同样返回 `Expired`
    pub async fn ensure_active(&self, enquiry: Enquiry, now: DateTime<Utc>) -> Result<Enquiry> {
        let enquiry = self.refresh(enquiry, now).await?;
        if enquiry.status == EnquiryStatus::Expired {
            return Err(KalaError::Expired(enquiry.id));
        }

        Ok(enquiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enquiry::fixtures::new_enquiry;
    use crate::repository::MockEnquiryRepositoryTrait;
    use chrono::Duration;

    #[tokio::test]
    async fn test_active_enquiry_untouched() {
        let mut repo = MockEnquiryRepositoryTrait::new();
        repo.expect_mark_expired().never();

        let expiry = EnquiryExpiry::new(Arc::new(repo));
        let now = Utc::now();
        let enquiry = new_enquiry("u1", &["a1"], now).into_enquiry();

        let result = expiry
            .ensure_active(enquiry.clone(), now + Duration::days(7))
            .await
            .unwrap();
        assert_eq!(result, enquiry);
    }

    #[tokio::test]
    async fn test_transition_persists_and_fails_expired() {
        let mut repo = MockEnquiryRepositoryTrait::new();
        repo.expect_mark_expired().times(1).returning(|_, _| Ok(true));

        let expiry = EnquiryExpiry::new(Arc::new(repo));
        let created = Utc::now();
        let enquiry = new_enquiry("u1", &["a1"], created).into_enquiry();
        let id = enquiry.id;

        let err = expiry
            .ensure_active(enquiry, created + Duration::days(8))
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::Expired(e) if e == id));
    }

    #[tokio::test]
    async fn test_lost_race_still_reports_expired() {
        let mut repo = MockEnquiryRepositoryTrait::new();
        // 另一个请求已完成转换
        repo.expect_mark_expired().times(1).returning(|_, _| Ok(false));

        let expiry = EnquiryExpiry::new(Arc::new(repo));
        let created = Utc::now();
        let enquiry = new_enquiry("u1", &[], created).into_enquiry();

        let refreshed = expiry
            .refresh(enquiry, created + Duration::days(8))
            .await
            .unwrap();
        assert_eq!(refreshed.status, EnquiryStatus::Expired);
    }

    #[tokio::test]
    async fn test_already_expired_skips_write() {
        let mut repo = MockEnquiryRepositoryTrait::new();
        repo.expect_mark_expired().never();

        let expiry = EnquiryExpiry::new(Arc::new(repo));
        let now = Utc::now();
        let mut enquiry = new_enquiry("u1", &[], now).into_enquiry();
        enquiry.status = EnquiryStatus::Expired;

        assert!(matches!(
            expiry.ensure_active(enquiry, now).await,
            Err(KalaError::Expired(_))
        ));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut repo = MockEnquiryRepositoryTrait::new();
        repo.expect_mark_expired()
            .returning(|_, _| Err(KalaError::Database(sqlx::Error::PoolTimedOut)));

        let expiry = EnquiryExpiry::new(Arc::new(repo));
        let created = Utc::now();
        let enquiry = new_enquiry("u1", &[], created).into_enquiry();

        let err = expiry
            .ensure_active(enquiry, created + Duration::days(8))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
