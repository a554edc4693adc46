//! 联系方式揭示闸门
//!
//! 每条咨询最多揭示 3 位艺术家的联系方式。
//! 先读取联系方式（只读），再通过仓储的条件追加原子完成揭示，
//! 追加是唯一的写入，失败时不留下任何状态。
//! 追加未生效时重新读取咨询以确定拒绝原因，
//! 判定顺序：不存在 → 过期 → 额度 → 匹配关系 → 重复。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kala_shared::observability::metrics;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{EnquirySummary, MatchedArtist, MatchesView, RevealedContact};
use super::expiry::EnquiryExpiry;
use crate::error::{KalaError, Result};
use crate::models::{CONTACT_REVEAL_QUOTA, Enquiry, RevealRejection};
use crate::repository::{EnquiryRepositoryTrait, ProfileRepositoryTrait};

/// 联系方式揭示服务
pub struct ContactRevealGate {
    profile_repo: Arc<dyn ProfileRepositoryTrait>,
    enquiry_repo: Arc<dyn EnquiryRepositoryTrait>,
    expiry: EnquiryExpiry,
}

impl ContactRevealGate {
    pub fn new(
        profile_repo: Arc<dyn ProfileRepositoryTrait>,
        enquiry_repo: Arc<dyn EnquiryRepositoryTrait>,
    ) -> Self {
        Self {
            expiry: EnquiryExpiry::new(enquiry_repo.clone()),
            profile_repo,
            enquiry_repo,
        }
    }

    async fn load_active(&self, id: Uuid, user_id: &str, now: DateTime<Utc>) -> Result<Enquiry> {
        let enquiry = self
            .enquiry_repo
            .get_owned(id, user_id)
            .await?
            .ok_or(KalaError::EnquiryNotFound(id))?;

        self.expiry.ensure_active(enquiry, now).await
    }

    /// 查看匹配结果
    pub async fn get_matches(&self, enquiry_id: Uuid, user_id: &str) -> Result<MatchesView> {
        self.get_matches_at(enquiry_id, user_id, Utc::now()).await
    }

    /// 以指定时间查看匹配结果
    ///
    /// 未揭示艺术家的 phone/email 以掩码返回，艺术家按匹配顺序排列
    #[instrument(skip(self), fields(enquiry_id = %enquiry_id))]
    pub async fn get_matches_at(
        &self,
        enquiry_id: Uuid,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<MatchesView> {
        let enquiry = self.load_active(enquiry_id, user_id, now).await?;

        let mut profiles: HashMap<String, _> = self
            .profile_repo
            .get_artists_by_ids(&enquiry.matched_artists)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        // 档案被删除的艺术家直接跳过
        let artists = enquiry
            .matched_artists
            .iter()
            .filter_map(|id| profiles.remove(id))
            .map(|profile| {
                let revealed = enquiry.is_revealed(&profile.id);
                MatchedArtist::from_profile(profile, revealed)
            })
            .collect();

        Ok(MatchesView {
            enquiry: EnquirySummary::from(&enquiry),
            artists,
        })
    }

    /// 揭示艺术家联系方式
    pub async fn reveal(
        &self,
        enquiry_id: Uuid,
        artist_id: &str,
        user_id: &str,
    ) -> Result<RevealedContact> {
        self.reveal_at(enquiry_id, artist_id, user_id, Utc::now())
            .await
    }

    /// 以指定时间揭示艺术家联系方式
    #[instrument(skip(self), fields(enquiry_id = %enquiry_id, artist_id = %artist_id))]
    pub async fn reveal_at(
        &self,
        enquiry_id: Uuid,
        artist_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RevealedContact> {
        let result = self.try_reveal(enquiry_id, artist_id, user_id, now).await;
        match &result {
            Ok(_) => metrics::record_contact_reveal("success"),
            Err(e) => {
                metrics::record_contact_reveal(e.metric_label());
                if e.is_business_error() {
                    warn!(error = %e, "联系方式揭示被拒绝");
                }
            }
        }
        result
    }

    async fn try_reveal(
        &self,
        enquiry_id: Uuid,
        artist_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RevealedContact> {
        // 档案缺失时不消耗额度
        let Some(contact) = self.profile_repo.get_artist_contact(artist_id).await? else {
            let reason = self
                .rejection_reason(enquiry_id, artist_id, user_id, now)
                .await?;
            return Err(reason.unwrap_or_else(|| KalaError::NotMatched(artist_id.to_string())));
        };

        let updated = self
            .enquiry_repo
            .append_revealed(enquiry_id, user_id, artist_id, now)
            .await?;

        let Some(enquiry) = updated else {
            let reason = self
                .rejection_reason(enquiry_id, artist_id, user_id, now)
                .await?;
            return Err(reason.unwrap_or_else(|| {
                KalaError::Internal(format!(
                    "揭示条件满足但追加未生效: enquiry_id={}",
                    enquiry_id
                ))
            }));
        };

        let contacts_remaining = CONTACT_REVEAL_QUOTA.saturating_sub(enquiry.contacts_revealed.len());
        info!(contacts_remaining, "联系方式已揭示");

        Ok(RevealedContact {
            contact,
            contacts_remaining,
        })
    }

    /// 确定揭示被拒绝的原因
    ///
    /// 不存在、过期作为业务拒绝返回；存储故障原样上抛；条件全部满足时返回 None
    async fn rejection_reason(
        &self,
        enquiry_id: Uuid,
        artist_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<KalaError>> {
        let enquiry = match self.load_active(enquiry_id, user_id, now).await {
            Ok(enquiry) => enquiry,
            Err(e) if e.is_business_error() => return Ok(Some(e)),
            Err(e) => return Err(e),
        };

        let reason = enquiry.reveal_rejection(artist_id).map(|rejection| match rejection {
            RevealRejection::QuotaExceeded => KalaError::QuotaExceeded {
                enquiry_id,
                limit: CONTACT_REVEAL_QUOTA,
            },
            RevealRejection::NotMatched => KalaError::NotMatched(artist_id.to_string()),
            RevealRejection::AlreadyRevealed => KalaError::AlreadyRevealed(artist_id.to_string()),
        });
        Ok(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enquiry::fixtures::new_enquiry;
    use crate::models::profile::fixtures::artist;
    use crate::models::{EnquiryStatus, HIDDEN_CONTACT};
    use crate::repository::{
        InMemoryEnquiryRepository, InMemoryProfileRepository, MockEnquiryRepositoryTrait,
        MockProfileRepositoryTrait,
    };
    use chrono::Duration;

    struct Fixture {
        gate: ContactRevealGate,
        enquiries: Arc<InMemoryEnquiryRepository>,
        enquiry_id: Uuid,
        created_at: DateTime<Utc>,
    }

    fn setup(matched: &[&str]) -> Fixture {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        for id in ["a1", "a2", "a3", "a4"] {
            profiles.insert_artist(artist(id, 300.0));
        }
        let enquiries = Arc::new(InMemoryEnquiryRepository::new());
        let created_at = Utc::now();
        let enquiry = new_enquiry("u1", matched, created_at).into_enquiry();
        let enquiry_id = enquiry.id;
        enquiries.seed(enquiry);

        Fixture {
            gate: ContactRevealGate::new(profiles, enquiries.clone()),
            enquiries,
            enquiry_id,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_reveal_success_returns_contact_and_remaining() {
        let f = setup(&["a1", "a2", "a3"]);

        let revealed = f
            .gate
            .reveal_at(f.enquiry_id, "a2", "u1", f.created_at)
            .await
            .unwrap();
        assert_eq!(revealed.contact.artist_id, "a2");
        assert_eq!(revealed.contact.email.as_deref(), Some("a2@example.com"));
        assert_eq!(revealed.contacts_remaining, 2);

        let stored = f.enquiries.get(f.enquiry_id).unwrap();
        assert_eq!(stored.contacts_revealed, vec!["a2".to_string()]);
    }

    #[tokio::test]
    async fn test_reveal_twice_fails_already_revealed_without_change() {
        let f = setup(&["a1", "a2", "a3"]);
        f.gate
            .reveal_at(f.enquiry_id, "a1", "u1", f.created_at)
            .await
            .unwrap();
        let before = f.enquiries.get(f.enquiry_id).unwrap();

        let err = f
            .gate
            .reveal_at(f.enquiry_id, "a1", "u1", f.created_at)
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::AlreadyRevealed(ref id) if id == "a1"));
        assert_eq!(f.enquiries.get(f.enquiry_id).unwrap(), before);
    }

    #[tokio::test]
    async fn test_reveal_not_matched() {
        let f = setup(&["a1"]);
        let err = f
            .gate
            .reveal_at(f.enquiry_id, "a4", "u1", f.created_at)
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::NotMatched(_)));
    }

    #[tokio::test]
    async fn test_reveal_quota_checked_before_membership() {
        let f = setup(&["a1", "a2", "a3"]);
        for id in ["a1", "a2", "a3"] {
            f.gate
                .reveal_at(f.enquiry_id, id, "u1", f.created_at)
                .await
                .unwrap();
        }

        let err = f
            .gate
            .reveal_at(f.enquiry_id, "a4", "u1", f.created_at)
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::QuotaExceeded { limit: 3, .. }));
    }

    #[tokio::test]
    async fn test_reveal_not_owner_is_not_found() {
        let f = setup(&["a1"]);
        let err = f
            .gate
            .reveal_at(f.enquiry_id, "a1", "intruder", f.created_at)
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::EnquiryNotFound(_)));
        assert!(f.enquiries.get(f.enquiry_id).unwrap().contacts_revealed.is_empty());
    }

    #[tokio::test]
    async fn test_reveal_after_expiry() {
        let f = setup(&["a1"]);
        let later = f.created_at + Duration::days(8);

        let err = f
            .gate
            .reveal_at(f.enquiry_id, "a1", "u1", later)
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::Expired(_)));
        assert_eq!(
            f.enquiries.get(f.enquiry_id).unwrap().status,
            EnquiryStatus::Expired
        );
    }

    #[tokio::test]
    async fn test_get_matches_masks_unrevealed_contacts() {
        let f = setup(&["a3", "a1", "a2"]);
        f.gate
            .reveal_at(f.enquiry_id, "a1", "u1", f.created_at)
            .await
            .unwrap();

        let view = f
            .gate
            .get_matches_at(f.enquiry_id, "u1", f.created_at)
            .await
            .unwrap();

        let order: Vec<_> = view.artists.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["a3", "a1", "a2"]);
        assert_eq!(view.enquiry.contacts_revealed_count, 1);
        assert_eq!(view.enquiry.contacts_remaining, 2);

        for a in &view.artists {
            if a.id == "a1" {
                assert_eq!(a.phone.as_deref(), Some("+91-98a1"));
            } else {
                assert_eq!(a.phone.as_deref(), Some(HIDDEN_CONTACT));
                assert_eq!(a.email.as_deref(), Some(HIDDEN_CONTACT));
            }
        }
    }

    #[tokio::test]
    async fn test_get_matches_expired_at_t_plus_8_days() {
        let f = setup(&["a1"]);
        let later = f.created_at + Duration::days(8);

        let first = f.gate.get_matches_at(f.enquiry_id, "u1", later).await;
        assert!(matches!(first, Err(KalaError::Expired(_))));

        let second = f.gate.get_matches_at(f.enquiry_id, "u1", later).await;
        assert!(matches!(second, Err(KalaError::Expired(_))));
    }

    #[tokio::test]
    async fn test_get_matches_unknown_enquiry() {
        let f = setup(&["a1"]);
        let err = f
            .gate
            .get_matches_at(Uuid::now_v7(), "u1", f.created_at)
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::EnquiryNotFound(_)));
    }

    #[tokio::test]
    async fn test_reveal_storage_failure_propagates() {
        let mut profiles = MockProfileRepositoryTrait::new();
        profiles
            .expect_get_artist_contact()
            .returning(|id| Ok(Some(artist(id, 300.0).contact())));
        let mut enquiries = MockEnquiryRepositoryTrait::new();
        enquiries
            .expect_append_revealed()
            .returning(|_, _, _, _| Err(KalaError::Database(sqlx::Error::PoolClosed)));

        let gate = ContactRevealGate::new(Arc::new(profiles), Arc::new(enquiries));
        let err = gate
            .reveal_at(Uuid::now_v7(), "a1", "u1", Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_reveal_contact_read_failure_persists_nothing() {
        let enquiries = Arc::new(InMemoryEnquiryRepository::new());
        let created_at = Utc::now();
        let enquiry = new_enquiry("u1", &["a1", "a2", "a3"], created_at).into_enquiry();
        let enquiry_id = enquiry.id;
        enquiries.seed(enquiry);

        let mut failing = MockProfileRepositoryTrait::new();
        failing
            .expect_get_artist_contact()
            .returning(|_| Err(KalaError::Database(sqlx::Error::PoolTimedOut)));
        let gate = ContactRevealGate::new(Arc::new(failing), enquiries.clone());

        let err = gate
            .reveal_at(enquiry_id, "a1", "u1", created_at)
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(enquiries.get(enquiry_id).unwrap().contacts_revealed.is_empty());

        // 存储恢复后重试成功，额度未被占用
        let profiles = Arc::new(InMemoryProfileRepository::new());
        profiles.insert_artist(artist("a1", 300.0));
        let gate = ContactRevealGate::new(profiles, enquiries.clone());
        let revealed = gate
            .reveal_at(enquiry_id, "a1", "u1", created_at)
            .await
            .unwrap();
        assert_eq!(revealed.contacts_remaining, 2);
        assert_eq!(
            enquiries.get(enquiry_id).unwrap().contacts_revealed,
            vec!["a1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_reveal_missing_profile_spends_no_quota() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        profiles.insert_artist(artist("a2", 300.0));
        let enquiries = Arc::new(InMemoryEnquiryRepository::new());
        let created_at = Utc::now();
        let enquiry = new_enquiry("u1", &["a1", "a2"], created_at).into_enquiry();
        let enquiry_id = enquiry.id;
        enquiries.seed(enquiry);
        let gate = ContactRevealGate::new(profiles, enquiries.clone());

        let err = gate
            .reveal_at(enquiry_id, "a1", "u1", created_at)
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::NotMatched(ref id) if id == "a1"));
        assert!(enquiries.get(enquiry_id).unwrap().contacts_revealed.is_empty());
    }

    #[tokio::test]
    async fn test_reveal_missing_profile_on_foreign_enquiry_is_not_found() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let enquiries = Arc::new(InMemoryEnquiryRepository::new());
        let created_at = Utc::now();
        let enquiry = new_enquiry("u1", &["a1"], created_at).into_enquiry();
        let enquiry_id = enquiry.id;
        enquiries.seed(enquiry);
        let gate = ContactRevealGate::new(profiles, enquiries);

        let err = gate
            .reveal_at(enquiry_id, "a1", "intruder", created_at)
            .await
            .unwrap_err();
        assert!(matches!(err, KalaError::EnquiryNotFound(_)));
    }
}
