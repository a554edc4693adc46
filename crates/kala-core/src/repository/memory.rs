//! 内存仓储
//!
//! 使用 DashMap 实现的内存存储，适用于测试和本地开发。
//! 与 PostgreSQL 实现保持相同的原子语义：
//! - 揭示在条目写锁内完成检查与追加
//! - 限频写入在互斥锁内完成统计与插入

use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use super::traits::{EnquiryRepositoryTrait, ExhibitionRepositoryTrait, ProfileRepositoryTrait};
use crate::error::Result;
use crate::models::{
    ArtistContact, ArtistProfile, ClassType, Enquiry, EnquiryStatus, Exhibition,
    ExhibitionStatus, NewEnquiry, NewExhibition, RequesterProfile,
};

/// 通用内存存储
#[derive(Debug)]
pub struct MemoryStore<K, V>
where
    K: Eq + Hash,
{
    data: Arc<DashMap<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V: Clone> MemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// 插入或覆盖
    pub fn insert(&self, key: K, value: V) {
        self.data.insert(key, value);
    }

    /// 返回克隆，不持有锁
    pub fn get(&self, key: &K) -> Option<V> {
        self.data.get(key).map(|v| v.clone())
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.data.remove(key).map(|(_, v)| v)
    }

    /// 按条件筛选
    pub fn list_by<F>(&self, predicate: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        self.data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 在条目写锁内修改，返回闭包结果
    pub fn update<R, F>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&mut V) -> R,
    {
        self.data.get_mut(key).map(|mut entry| f(entry.value_mut()))
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }
}

// ==================== 档案 ====================

/// 内存档案仓储
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    artists: MemoryStore<String, ArtistProfile>,
    requesters: MemoryStore<String, RequesterProfile>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_artist(&self, artist: ArtistProfile) {
        self.artists.insert(artist.id.clone(), artist);
    }

    pub fn insert_requester(&self, requester: RequesterProfile) {
        self.requesters.insert(requester.id.clone(), requester);
    }
}

#[async_trait]
impl ProfileRepositoryTrait for InMemoryProfileRepository {
    async fn list_candidate_pool(&self, _class_type: ClassType) -> Result<Vec<ArtistProfile>> {
        // 授课方式交给匹配器过滤
        Ok(self.artists.list_by(ArtistProfile::is_candidate))
    }

    async fn get_artists_by_ids(&self, ids: &[String]) -> Result<Vec<ArtistProfile>> {
        Ok(ids.iter().filter_map(|id| self.artists.get(id)).collect())
    }

    async fn get_artist_contact(&self, artist_id: &str) -> Result<Option<ArtistContact>> {
        Ok(self
            .artists
            .get(&artist_id.to_string())
            .map(|artist| artist.contact()))
    }

    async fn get_requester(&self, user_id: &str) -> Result<Option<RequesterProfile>> {
        Ok(self.requesters.get(&user_id.to_string()))
    }
}

// ==================== 咨询 ====================

/// 内存咨询仓储
#[derive(Debug, Default)]
pub struct InMemoryEnquiryRepository {
    enquiries: MemoryStore<Uuid, Enquiry>,
    insert_lock: Mutex<()>,
}

impl InMemoryEnquiryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接写入一条记录，绕过限频（测试造数用）
    pub fn seed(&self, enquiry: Enquiry) {
        self.enquiries.insert(enquiry.id, enquiry);
    }

    pub fn get(&self, id: Uuid) -> Option<Enquiry> {
        self.enquiries.get(&id)
    }

    pub fn count(&self) -> usize {
        self.enquiries.count()
    }
}

#[async_trait]
impl EnquiryRepositoryTrait for InMemoryEnquiryRepository {
    async fn insert_unless_recent(
        &self,
        enquiry: &NewEnquiry,
        window: Duration,
    ) -> Result<Option<Enquiry>> {
        let _guard = self.insert_lock.lock();

        let window_start = enquiry.created_at - window;
        let has_recent = !self
            .enquiries
            .list_by(|e| e.user_id == enquiry.user_id && e.created_at > window_start)
            .is_empty();
        if has_recent {
            return Ok(None);
        }

        let stored = enquiry.clone().into_enquiry();
        self.enquiries.insert(stored.id, stored.clone());
        Ok(Some(stored))
    }

    async fn get_owned(&self, id: Uuid, user_id: &str) -> Result<Option<Enquiry>> {
        Ok(self.enquiries.get(&id).filter(|e| e.user_id == user_id))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Enquiry>> {
        let mut enquiries = self.enquiries.list_by(|e| e.user_id == user_id);
        enquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(enquiries)
    }

    async fn mark_expired(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let transitioned = self.enquiries.update(&id, |e| {
            if e.needs_expiry(now) {
                e.status = EnquiryStatus::Expired;
                e.updated_at = now;
                true
            } else {
                false
            }
        });

        Ok(transitioned.unwrap_or(false))
    }

    async fn append_revealed(
        &self,
        id: Uuid,
        user_id: &str,
        artist_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Enquiry>> {
        let updated = self.enquiries.update(&id, |e| {
            if e.user_id != user_id
                || e.is_expired_at(now)
                || e.reveal_rejection(artist_id).is_some()
            {
                return None;
            }
            e.contacts_revealed.push(artist_id.to_string());
            e.updated_at = now;
            Some(e.clone())
        });

        Ok(updated.flatten())
    }
}

// ==================== 展览 ====================

/// 内存展览仓储
#[derive(Debug, Default)]
pub struct InMemoryExhibitionRepository {
    exhibitions: MemoryStore<Uuid, Exhibition>,
}

impl InMemoryExhibitionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<Exhibition> {
        self.exhibitions.get(&id)
    }
}

fn newest_first(mut exhibitions: Vec<Exhibition>) -> Vec<Exhibition> {
    exhibitions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    exhibitions
}

#[async_trait]
impl ExhibitionRepositoryTrait for InMemoryExhibitionRepository {
    async fn create(&self, exhibition: &NewExhibition) -> Result<Exhibition> {
        let stored = exhibition.clone().into_exhibition();
        self.exhibitions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_by_artist(&self, artist_id: &str) -> Result<Vec<Exhibition>> {
        Ok(newest_first(
            self.exhibitions.list_by(|e| e.artist_id == artist_id),
        ))
    }

    async fn list_public(&self, status: Option<ExhibitionStatus>) -> Result<Vec<Exhibition>> {
        Ok(newest_first(self.exhibitions.list_by(|e| {
            e.is_approved && status.is_none_or(|s| e.status == s)
        })))
    }

    async fn list_pending(&self) -> Result<Vec<Exhibition>> {
        let mut pending = self.exhibitions.list_by(|e| !e.is_approved);
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    async fn approve(&self, id: Uuid) -> Result<Option<Exhibition>> {
        Ok(self.exhibitions.update(&id, |e| {
            e.is_approved = true;
            e.status = ExhibitionStatus::Active;
            e.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.exhibitions.remove(&id).is_some())
    }
}
