//! 数据库仓储层
//!
//! 提供档案、咨询、展览的数据访问接口。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 条件写入失败返回 None/false，由服务层决定错误类型
//! - PostgreSQL 实现用于生产，内存实现用于测试和本地开发

mod enquiry_repo;
mod exhibition_repo;
pub mod memory;
mod profile_repo;
mod traits;

pub use enquiry_repo::EnquiryRepository;
pub use exhibition_repo::ExhibitionRepository;
pub use memory::{InMemoryEnquiryRepository, InMemoryExhibitionRepository, InMemoryProfileRepository};
pub use profile_repo::ProfileRepository;
pub use traits::*;
