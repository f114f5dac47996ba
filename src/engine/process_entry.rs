// ==========================================
// 针织样品生产跟踪 - 工序录入服务
// ==========================================
// 职责: 工序行的加载、新建、更新、删除
// 红线: 已保存的工序行不可改名（ProcessName 是主键的一部分）
// ==========================================

use crate::config::WorkflowConfigReader;
use crate::domain::process::{ProcessDraft, ProcessRecord};
use crate::domain::types::Rsn;
use crate::engine::error::{WorkflowError, WorkflowResult};
use crate::repository::entity_repo::ProcessRepository;
use std::sync::Arc;

pub struct ProcessEntryService {
    repo: Arc<dyn ProcessRepository>,
    config: Arc<dyn WorkflowConfigReader>,
}

impl ProcessEntryService {
    pub fn new(repo: Arc<dyn ProcessRepository>, config: Arc<dyn WorkflowConfigReader>) -> Self {
        Self { repo, config }
    }

    /// 加载已有工序行（均为非新建行）
    pub async fn load_rows(&self, rsn: Rsn) -> WorkflowResult<Vec<ProcessDraft>> {
        let records = self.repo.find_by_rsn(rsn).await?;
        Ok(records.iter().map(ProcessDraft::from_record).collect())
    }

    /// 可选工序目录
    pub async fn catalog(&self) -> WorkflowResult<Vec<String>> {
        self.config
            .get_process_catalog()
            .await
            .map_err(|e| WorkflowError::Configuration(e.to_string()))
    }

    /// 追加一个空白新行
    pub fn add_row(rows: &[ProcessDraft]) -> Vec<ProcessDraft> {
        let mut next = rows.to_vec();
        next.push(ProcessDraft::blank());
        next
    }

    /// 保存新行
    ///
    /// # 返回
    /// - Ok(ProcessRecord): 已落库记录（Other 已替换为自定义名称）
    /// - Err(Validation): 字段校验失败，不发起写入
    pub async fn create_row(
        &self,
        rsn: Rsn,
        draft: &ProcessDraft,
        user_id: &str,
    ) -> WorkflowResult<ProcessRecord> {
        if !draft.is_new {
            return Err(WorkflowError::validation(
                "ProcessName",
                "已保存的工序行只能更新",
            ));
        }
        let catalog = self.catalog().await?;
        let record = draft.to_record(rsn, user_id, &catalog)?;
        let created = self.repo.create(record).await?;
        tracing::info!(rsn, process_name = %created.process_name, "工序已新建");
        Ok(created)
    }

    /// 更新已保存的行
    ///
    /// # 参数
    /// - locked_name: 该行落库时的 ProcessName
    pub async fn update_row(
        &self,
        rsn: Rsn,
        locked_name: &str,
        draft: &ProcessDraft,
        user_id: &str,
    ) -> WorkflowResult<ProcessRecord> {
        if draft.is_new {
            return Err(WorkflowError::validation("ProcessName", "新行需要先保存"));
        }
        if draft.effective_process_name() != locked_name {
            return Err(WorkflowError::validation(
                "ProcessName",
                format!("已保存的工序不可改名: {}", locked_name),
            ));
        }
        let patch = draft.to_patch(user_id)?;
        let updated = self.repo.update(rsn, locked_name, patch).await?;
        tracing::info!(rsn, process_name = locked_name, "工序已更新");
        Ok(updated)
    }

    pub async fn delete_row(&self, rsn: Rsn, process_name: &str) -> WorkflowResult<()> {
        self.repo.delete(rsn, process_name).await?;
        tracing::info!(rsn, process_name, "工序已删除");
        Ok(())
    }

    /// 该 RSN 已落库的工序行数
    pub async fn saved_count(&self, rsn: Rsn) -> WorkflowResult<usize> {
        Ok(self.repo.find_by_rsn(rsn).await?.len())
    }
}
