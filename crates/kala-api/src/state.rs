//! 应用状态定义
//!
//! 连接池、仓储和服务在 main 中显式构造后注入

use std::sync::Arc;

use kala_core::{
    ContactRevealGate, EnquiryIntake, EnquiryRepositoryTrait, ExhibitionRepositoryTrait,
    ExhibitionService, ProfileRepositoryTrait,
};
use kala_shared::config::EnquiryConfig;

use crate::auth::JwtManager;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<EnquiryIntake>,
    pub reveal_gate: Arc<ContactRevealGate>,
    pub exhibitions: Arc<ExhibitionService>,
    pub jwt_manager: Arc<JwtManager>,
}

impl AppState {
    /// 基于仓储构造全部服务
    pub fn new(
        profile_repo: Arc<dyn ProfileRepositoryTrait>,
        enquiry_repo: Arc<dyn EnquiryRepositoryTrait>,
        exhibition_repo: Arc<dyn ExhibitionRepositoryTrait>,
        enquiry_config: EnquiryConfig,
        jwt_manager: JwtManager,
    ) -> Self {
        Self {
            intake: Arc::new(EnquiryIntake::new(
                profile_repo.clone(),
                enquiry_repo.clone(),
                enquiry_config,
            )),
            reveal_gate: Arc::new(ContactRevealGate::new(profile_repo, enquiry_repo)),
            exhibitions: Arc::new(ExhibitionService::new(exhibition_repo)),
            jwt_manager: Arc::new(jwt_manager),
        }
    }
}
