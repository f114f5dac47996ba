// ==========================================
// 针织样品生产跟踪 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合工作流引擎所需的所有 Repository
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::repository::{
    ColorMatchingRepository, ColorMatchingRepositoryImpl, KnittingRepository,
    KnittingRepositoryImpl, ProcessRepository, ProcessRepositoryImpl, SampleRepository,
    SampleRepositoryImpl,
};

/// 样品工作流仓储集合
///
/// # 包含的仓储
/// - `sample_repo`: 样品
/// - `process_repo`: 工序
/// - `knitting_repo`: 针织明细
/// - `color_repo`: 配色记录
#[derive(Clone)]
pub struct SampleRepositories {
    pub sample_repo: Arc<dyn SampleRepository>,
    pub process_repo: Arc<dyn ProcessRepository>,
    pub knitting_repo: Arc<dyn KnittingRepository>,
    pub color_repo: Arc<dyn ColorMatchingRepository>,
}

impl SampleRepositories {
    pub fn new(
        sample_repo: Arc<dyn SampleRepository>,
        process_repo: Arc<dyn ProcessRepository>,
        knitting_repo: Arc<dyn KnittingRepository>,
        color_repo: Arc<dyn ColorMatchingRepository>,
    ) -> Self {
        Self {
            sample_repo,
            process_repo,
            knitting_repo,
            color_repo,
        }
    }

    /// 基于同一个 SQLite 连接构建全部仓储
    pub fn sqlite(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            sample_repo: Arc::new(SampleRepositoryImpl::from_connection(conn.clone())),
            process_repo: Arc::new(ProcessRepositoryImpl::from_connection(conn.clone())),
            knitting_repo: Arc::new(KnittingRepositoryImpl::from_connection(conn.clone())),
            color_repo: Arc::new(ColorMatchingRepositoryImpl::from_connection(conn)),
        }
    }
}
