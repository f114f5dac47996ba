// ==========================================
// 针织样品生产跟踪 - 实体仓储接口
// ==========================================
// 职责: 定义各实体的 CRUD 接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 说明: 幂等投递与冲突处理由实现方负责，引擎层不加锁
// ==========================================

use crate::domain::{
    ColorMatching, KnittingDetail, ProcessPatch, ProcessRecord, Rsn, Sample, Totals,
};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// SampleRepository
// ==========================================
// 实现者: SampleRepositoryImpl（rusqlite）
#[async_trait]
pub trait SampleRepository: Send + Sync {
    /// 新建样品（RSN 已存在时返回唯一约束错误）
    async fn create(&self, sample: Sample) -> RepositoryResult<Sample>;

    /// 按 RSN 查询样品
    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Option<Sample>>;

    /// 查询全部样品（按 RSN 升序）
    async fn list_all(&self) -> RepositoryResult<Vec<Sample>>;

    /// 更新样品合计
    ///
    /// # 返回
    /// - Ok(Sample): 更新后的样品
    /// - Err(NotFound): RSN 不存在
    async fn update_totals(&self, rsn: Rsn, totals: Totals) -> RepositoryResult<Sample>;
}

// ==========================================
// ProcessRepository
// ==========================================
// 主键: (RSN, ProcessName)
#[async_trait]
pub trait ProcessRepository: Send + Sync {
    async fn create(&self, record: ProcessRecord) -> RepositoryResult<ProcessRecord>;

    /// 按复合键更新非主键字段
    async fn update(
        &self,
        rsn: Rsn,
        process_name: &str,
        patch: ProcessPatch,
    ) -> RepositoryResult<ProcessRecord>;

    /// 按复合键删除
    async fn delete(&self, rsn: Rsn, process_name: &str) -> RepositoryResult<()>;

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Vec<ProcessRecord>>;
}

// ==========================================
// KnittingRepository
// ==========================================
// 每个 RSN 一条记录
#[async_trait]
pub trait KnittingRepository: Send + Sync {
    /// 写入或整体覆盖针织明细
    async fn upsert(&self, detail: KnittingDetail) -> RepositoryResult<KnittingDetail>;

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Option<KnittingDetail>>;
}

// ==========================================
// ColorMatchingRepository
// ==========================================
// 主键: ColorId
#[async_trait]
pub trait ColorMatchingRepository: Send + Sync {
    async fn create(&self, record: ColorMatching) -> RepositoryResult<ColorMatching>;

    /// 按 ColorId 删除单条
    async fn delete(&self, color_id: &str) -> RepositoryResult<()>;

    /// 删除某 RSN 下的全部配色记录
    ///
    /// # 返回
    /// - Ok(usize): 删除的记录数
    async fn delete_by_rsn(&self, rsn: Rsn) -> RepositoryResult<usize>;

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Vec<ColorMatching>>;
}
