//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    ArtistContact, ArtistProfile, ClassType, Enquiry, Exhibition, ExhibitionStatus, NewEnquiry,
    NewExhibition, RequesterProfile,
};

/// 档案仓储接口（只读）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepositoryTrait: Send + Sync {
    /// 匹配候选池
    ///
    /// 实现可以下推候选条件与授课方式，匹配器仍会在进程内完整过滤一遍
    async fn list_candidate_pool(&self, class_type: ClassType) -> Result<Vec<ArtistProfile>>;

    async fn get_artists_by_ids(&self, ids: &[String]) -> Result<Vec<ArtistProfile>>;

    async fn get_artist_contact(&self, artist_id: &str) -> Result<Option<ArtistContact>>;

    async fn get_requester(&self, user_id: &str) -> Result<Option<RequesterProfile>>;
}

/// 咨询仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnquiryRepositoryTrait: Send + Sync {
    /// 在限频窗口内没有咨询时写入
    ///
    /// 窗口内已有咨询返回 None，检查与写入必须是原子的
    async fn insert_unless_recent(
        &self,
        enquiry: &NewEnquiry,
        window: Duration,
    ) -> Result<Option<Enquiry>>;

    /// 按 ID 和发起人查询
    async fn get_owned(&self, id: Uuid, user_id: &str) -> Result<Option<Enquiry>>;

    /// 用户的全部咨询，按创建时间倒序
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Enquiry>>;

    /// 条件写入过期状态，返回本次调用是否完成了状态转换
    async fn mark_expired(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool>;

    /// 条件追加已揭示艺术家
    ///
    /// 归属、未过期、额度、匹配关系、未重复全部满足时追加并返回新记录，
    /// 否则不做修改并返回 None
    async fn append_revealed(
        &self,
        id: Uuid,
        user_id: &str,
        artist_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Enquiry>>;
}

/// 展览仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExhibitionRepositoryTrait: Send + Sync {
    async fn create(&self, exhibition: &NewExhibition) -> Result<Exhibition>;

    async fn list_by_artist(&self, artist_id: &str) -> Result<Vec<Exhibition>>;

    /// 已审核展览，status 为空时返回全部状态
    async fn list_public(&self, status: Option<ExhibitionStatus>) -> Result<Vec<Exhibition>>;

    async fn list_pending(&self) -> Result<Vec<Exhibition>>;

    /// 审核通过并上线，展览不存在时返回 None
    async fn approve(&self, id: Uuid) -> Result<Option<Exhibition>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}
