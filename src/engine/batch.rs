// ==========================================
// 针织样品生产跟踪 - 批量提交协调器
// ==========================================
// 职责: 将 N 条记录提交到实体仓储
// 流程:
// 1. Update 模式先整体删除该 RSN 的旧记录（等待完成后才开始创建）
// 2. 并发发起全部创建调用，等待全部返回
// 3. 任一失败 → PartialWriteFailure；已写入记录默认不回滚
// 说明: 可通过配置开启补偿删除（删除本批次已成功写入的记录）
// ==========================================

use crate::domain::color::ColorMatching;
use crate::domain::panel::PanelSelection;
use crate::domain::types::{Rsn, WorkflowMode};
use crate::engine::color_id::derive_color_id;
use crate::engine::error::{WorkflowError, WorkflowResult};
use crate::repository::entity_repo::ColorMatchingRepository;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

// ==========================================
// BatchTarget - 批量写入目标
// ==========================================
#[async_trait]
pub trait BatchTarget<R>: Send + Sync
where
    R: Send + Sync + 'static,
{
    /// 实体名（日志与错误报告）
    fn entity(&self) -> &'static str;

    /// 记录主键
    fn key_of(&self, record: &R) -> String;

    /// 删除某 RSN 下的全部记录
    async fn delete_all_for_rsn(&self, rsn: Rsn) -> RepositoryResult<usize>;

    async fn create(&self, record: R) -> RepositoryResult<R>;

    /// 补偿删除单条已写入记录
    async fn compensate(&self, record: &R) -> RepositoryResult<()>;
}

/// 配色记录写入目标
pub struct ColorMatchingTarget {
    repo: Arc<dyn ColorMatchingRepository>,
}

impl ColorMatchingTarget {
    pub fn new(repo: Arc<dyn ColorMatchingRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl BatchTarget<ColorMatching> for ColorMatchingTarget {
    fn entity(&self) -> &'static str {
        "ColorMatching"
    }

    fn key_of(&self, record: &ColorMatching) -> String {
        record.color_id.clone()
    }

    async fn delete_all_for_rsn(&self, rsn: Rsn) -> RepositoryResult<usize> {
        self.repo.delete_by_rsn(rsn).await
    }

    async fn create(&self, record: ColorMatching) -> RepositoryResult<ColorMatching> {
        self.repo.create(record).await
    }

    async fn compensate(&self, record: &ColorMatching) -> RepositoryResult<()> {
        self.repo.delete(&record.color_id).await
    }
}

// ==========================================
// 配色记录构建
// ==========================================

/// 由 配色名 × 选中衣片 生成待写入的配色记录
///
/// # 参数
/// - rsn: 样品号
/// - matching_names: 用户输入的配色名（首尾空白会被去除）
/// - selection: 衣片选择集
/// - size: 针织阶段确定的尺码
/// - user_id: 当前操作用户
///
/// # 返回
/// - Err(Validation): 无配色名/空配色名/无选中衣片/名称过短/同批 ColorId 冲突
pub fn build_color_matching_records(
    rsn: Rsn,
    matching_names: &[String],
    selection: &PanelSelection,
    size: &str,
    user_id: &str,
) -> WorkflowResult<Vec<ColorMatching>> {
    if matching_names.is_empty() {
        return Err(WorkflowError::validation("MatchingName", "至少需要一个配色名"));
    }
    let panels = selection.selected();
    if panels.is_empty() {
        return Err(WorkflowError::validation("Panel", "没有选中的衣片"));
    }

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(matching_names.len() * panels.len());
    for raw in matching_names {
        let name = raw.trim();
        if name.is_empty() {
            return Err(WorkflowError::validation("MatchingName", "配色名不能为空"));
        }
        for panel in &panels {
            let color_id = derive_color_id(panel, rsn, name, size)?;
            if !seen.insert(color_id.clone()) {
                return Err(WorkflowError::validation(
                    "ColorId",
                    format!("同一批次内配色编号重复: {}", color_id),
                ));
            }
            records.push(ColorMatching {
                color_id,
                rsn,
                matching_name: name.to_string(),
                panel: panel.to_string(),
                user_id: user_id.to_string(),
            });
        }
    }
    Ok(records)
}

// ==========================================
// BatchSubmissionCoordinator
// ==========================================

/// 批量提交结果
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub batch_id: String,
    pub entity: &'static str,
    /// Update 模式删除的旧记录数
    pub deleted: usize,
    /// 成功写入的记录主键（与提交顺序一致）
    pub created_keys: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchSubmissionCoordinator {
    compensate_on_failure: bool,
}

impl BatchSubmissionCoordinator {
    pub fn new(compensate_on_failure: bool) -> Self {
        Self {
            compensate_on_failure,
        }
    }

    pub fn compensates(&self) -> bool {
        self.compensate_on_failure
    }

    /// 提交一批记录
    ///
    /// # 参数
    /// - target: 写入目标
    /// - rsn: 样品号
    /// - mode: 工作流模式（Update 时先整体删除）
    /// - records: 待写入记录（至少一条）
    ///
    /// # 返回
    /// - Ok(BatchReport): 全部写入成功
    /// - Err(RepositoryUnavailable): 删除失败，未发起任何创建
    /// - Err(PartialWriteFailure): 部分或全部创建失败
    pub async fn submit<R, T>(
        &self,
        target: &T,
        rsn: Rsn,
        mode: WorkflowMode,
        records: Vec<R>,
    ) -> WorkflowResult<BatchReport>
    where
        R: Send + Sync + 'static,
        T: BatchTarget<R> + ?Sized,
    {
        let entity = target.entity();
        if records.is_empty() {
            return Err(WorkflowError::validation(entity, "没有待写入的记录"));
        }

        let batch_id = Uuid::new_v4().to_string();
        tracing::info!(
            batch_id = %batch_id,
            rsn,
            entity,
            mode = %mode,
            count = records.len(),
            "开始批量提交"
        );

        // === 步骤 1: Update 模式整体删除 ===
        let deleted = if mode.replaces_existing() {
            let deleted = target.delete_all_for_rsn(rsn).await.map_err(|e| {
                tracing::error!(batch_id = %batch_id, rsn, entity, error = %e, "删除旧记录失败");
                e
            })?;
            tracing::info!(batch_id = %batch_id, rsn, entity, deleted, "旧记录已删除");
            deleted
        } else {
            0
        };

        // === 步骤 2: 并发创建 ===
        let keys: Vec<String> = records.iter().map(|r| target.key_of(r)).collect();
        let attempted = records.len();
        let results = join_all(records.into_iter().map(|r| target.create(r))).await;

        let mut created = Vec::new();
        let mut failed_keys = Vec::new();
        let mut first_error: Option<String> = None;
        for (key, result) in keys.into_iter().zip(results) {
            match result {
                Ok(record) => created.push((key, record)),
                Err(e) => {
                    tracing::warn!(batch_id = %batch_id, rsn, entity, key = %key, error = %e, "记录写入失败");
                    if first_error.is_none() {
                        first_error = Some(e.to_string());
                    }
                    failed_keys.push(key);
                }
            }
        }

        // === 步骤 3: 汇总 ===
        if let Some(first_error) = first_error {
            let compensated = if self.compensate_on_failure {
                self.compensate(target, &batch_id, &created).await
            } else {
                false
            };
            tracing::error!(
                batch_id = %batch_id,
                rsn,
                entity,
                attempted,
                failed = failed_keys.len(),
                compensated,
                "批量提交部分失败"
            );
            return Err(WorkflowError::PartialWriteFailure {
                entity: entity.to_string(),
                attempted,
                failed: failed_keys.len(),
                failed_keys,
                first_error,
                compensated,
            });
        }

        tracing::info!(batch_id = %batch_id, rsn, entity, created = created.len(), "批量提交完成");
        Ok(BatchReport {
            batch_id,
            entity,
            deleted,
            created_keys: created.into_iter().map(|(key, _)| key).collect(),
        })
    }

    /// 删除本批次已写入的记录
    ///
    /// # 返回
    /// - true: 全部补偿成功
    async fn compensate<R, T>(&self, target: &T, batch_id: &str, created: &[(String, R)]) -> bool
    where
        R: Send + Sync + 'static,
        T: BatchTarget<R> + ?Sized,
    {
        let mut all_ok = true;
        for (key, record) in created {
            if let Err(e) = target.compensate(record).await {
                tracing::error!(batch_id, key = %key, error = %e, "补偿删除失败");
                all_ok = false;
            }
        }
        all_ok
    }
}
