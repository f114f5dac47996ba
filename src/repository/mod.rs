// ==========================================
// 针织样品生产跟踪 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod color_matching_repo;
pub mod entity_repo;
pub mod error;
pub mod knitting_repo;
pub mod process_repo;
pub mod sample_repo;

// 重导出核心仓储
pub use color_matching_repo::ColorMatchingRepositoryImpl;
pub use entity_repo::{
    ColorMatchingRepository, KnittingRepository, ProcessRepository, SampleRepository,
};
pub use error::{RepositoryError, RepositoryResult};
pub use knitting_repo::KnittingRepositoryImpl;
pub use process_repo::ProcessRepositoryImpl;
pub use sample_repo::SampleRepositoryImpl;
