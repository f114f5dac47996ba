// ==========================================
// 针织样品生产跟踪 - 样品工作流引擎
// ==========================================
// 职责: 串联状态机、派生规则、批量提交与仓储
// 流程: 工序录入 → 衣片选择 → 针织录入 → 配色 → 复核
// 红线: 校验失败不发起任何仓储调用；写入失败阶段不前进
// ==========================================

use crate::config::WorkflowConfigReader;
use crate::domain::panel::PanelSelection;
use crate::domain::process::{ProcessDraft, ProcessRecord};
use crate::domain::types::{Rsn, WorkflowMode, WorkflowStage};
use crate::engine::batch::{
    build_color_matching_records, BatchReport, BatchSubmissionCoordinator, ColorMatchingTarget,
};
use crate::engine::error::{WorkflowError, WorkflowResult};
use crate::engine::navigation::{NavigationHandoff, NextRoute, PanelSelectionProvider};
use crate::engine::process_entry::ProcessEntryService;
use crate::engine::repositories::SampleRepositories;
use crate::engine::workflow::{StageState, WorkflowContext, WorkflowState};
use crate::i18n::t_with_args;
use std::sync::Arc;

// ==========================================
// SampleWorkflowEngine
// ==========================================
pub struct SampleWorkflowEngine {
    repos: SampleRepositories,
    config: Arc<dyn WorkflowConfigReader>,
    navigation: Arc<dyn NavigationHandoff>,
    panels: Arc<dyn PanelSelectionProvider>,
    process_entry: ProcessEntryService,
}

impl SampleWorkflowEngine {
    /// 创建引擎
    ///
    /// # 参数
    /// - repos: 仓储集合
    /// - config: 配置读取器
    /// - navigation: 导航交接协作者
    /// - panels: 衣片选择协作者
    pub fn new(
        repos: SampleRepositories,
        config: Arc<dyn WorkflowConfigReader>,
        navigation: Arc<dyn NavigationHandoff>,
        panels: Arc<dyn PanelSelectionProvider>,
    ) -> Self {
        let process_entry = ProcessEntryService::new(repos.process_repo.clone(), config.clone());
        Self {
            repos,
            config,
            navigation,
            panels,
            process_entry,
        }
    }

    pub fn process_entry(&self) -> &ProcessEntryService {
        &self.process_entry
    }

    fn handoff(&self, state: &WorkflowState) {
        let route = state.next_route();
        tracing::info!(
            rsn = state.rsn(),
            mode = %state.mode(),
            stage = %state.stage(),
            route = ?route,
            "阶段交接"
        );
        self.navigation.handoff(route, state.handoff_context());
    }

    async fn resolve_user_id(&self, user_id: &str) -> WorkflowResult<String> {
        let trimmed = user_id.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
        self.config
            .get_default_user_id()
            .await
            .map_err(|e| WorkflowError::Configuration(e.to_string()))
    }

    async fn build_context(
        &self,
        rsn: Rsn,
        mode: WorkflowMode,
        user_id: &str,
    ) -> WorkflowResult<WorkflowContext> {
        if self.repos.sample_repo.find_by_rsn(rsn).await?.is_none() {
            return Err(WorkflowError::validation(
                "RSN",
                format!("样品不存在: {}", rsn),
            ));
        }
        let user_id = self.resolve_user_id(user_id).await?;
        Ok(WorkflowContext::new(rsn, mode, user_id))
    }

    fn expect_stage(state: &WorkflowState, expected: WorkflowStage) -> WorkflowResult<()> {
        if state.stage() != expected {
            return Err(WorkflowError::InvalidStateTransition {
                from: state.stage(),
                to: expected,
            });
        }
        Ok(())
    }

    // ==========================================
    // 入口
    // ==========================================

    /// 从工序录入开始一个流程
    ///
    /// # 参数
    /// - rsn: 样品号（必须已存在）
    /// - mode: 工作流模式
    /// - user_id: 当前用户（为空时取配置默认值）
    pub async fn begin(
        &self,
        rsn: Rsn,
        mode: WorkflowMode,
        user_id: &str,
    ) -> WorkflowResult<WorkflowState> {
        let context = self.build_context(rsn, mode, user_id).await?;
        let state = WorkflowState::start(context);
        let rsn_text = rsn.to_string();
        tracing::info!(
            rsn,
            mode = %mode,
            "{}",
            t_with_args("workflow.started", &[("rsn", rsn_text.as_str())])
        );
        Ok(state)
    }

    /// 在衣片选择阶段重新进入（Update 流程）
    pub async fn reenter(
        &self,
        rsn: Rsn,
        mode: WorkflowMode,
        user_id: &str,
    ) -> WorkflowResult<WorkflowState> {
        let context = self.build_context(rsn, mode, user_id).await?;
        let state = WorkflowState::reenter_at_panel_selection(context);
        tracing::info!(rsn, mode = %mode, "工作流在衣片选择阶段重新进入");
        Ok(state)
    }

    // ==========================================
    // 工序录入
    // ==========================================

    /// 保存一行新工序
    pub async fn save_process(
        &self,
        state: &WorkflowState,
        draft: &ProcessDraft,
    ) -> WorkflowResult<(WorkflowState, ProcessRecord)> {
        Self::expect_stage(state, WorkflowStage::ProcessEntry)?;
        let record = self
            .process_entry
            .create_row(state.rsn(), draft, &state.context().user_id)
            .await?;
        let next = state.record_process_saved(&record.process_name)?;
        Ok((next, record))
    }

    /// 更新一行已保存的工序
    pub async fn update_process(
        &self,
        state: &WorkflowState,
        locked_name: &str,
        draft: &ProcessDraft,
    ) -> WorkflowResult<ProcessRecord> {
        Self::expect_stage(state, WorkflowStage::ProcessEntry)?;
        self.process_entry
            .update_row(state.rsn(), locked_name, draft, &state.context().user_id)
            .await
    }

    /// 删除一行已保存的工序，返回移除该工序后的新状态
    pub async fn delete_process(
        &self,
        state: &WorkflowState,
        process_name: &str,
    ) -> WorkflowResult<WorkflowState> {
        Self::expect_stage(state, WorkflowStage::ProcessEntry)?;
        self.process_entry.delete_row(state.rsn(), process_name).await?;
        state.record_process_deleted(process_name)
    }

    /// ProcessEntry → PanelSelection
    pub async fn finish_process_entry(&self, state: &WorkflowState) -> WorkflowResult<WorkflowState> {
        Self::expect_stage(state, WorkflowStage::ProcessEntry)?;
        let saved = self.process_entry.saved_count(state.rsn()).await?;
        let next = state.advance_to_panel_selection(saved)?;
        self.handoff(&next);
        Ok(next)
    }

    // ==========================================
    // 衣片选择
    // ==========================================

    /// PanelSelection → KnittingEntry
    ///
    /// 选择集由外部协作者提供；Update 模式用已有针织明细预填表单
    pub async fn select_panels(&self, state: &WorkflowState) -> WorkflowResult<WorkflowState> {
        Self::expect_stage(state, WorkflowStage::PanelSelection)?;
        let selection = PanelSelection::new(self.panels.panel_selection(state.rsn()))?;
        if !selection.has_selection() {
            return Err(WorkflowError::validation("Panel", "至少需要选择一个衣片"));
        }

        let existing = if state.mode().replaces_existing() {
            self.repos.knitting_repo.find_by_rsn(state.rsn()).await?
        } else {
            None
        };
        let next = state.select_panels(selection, existing.as_ref())?;
        self.handoff(&next);
        Ok(next)
    }

    // ==========================================
    // 针织录入
    // ==========================================

    /// KnittingEntry → ColorMatching
    ///
    /// # 流程
    /// 1. 校验表单（失败时不发起任何仓储调用）
    /// 2. 写入针织明细
    /// 3. 同步样品合计
    pub async fn submit_knitting(&self, state: &WorkflowState) -> WorkflowResult<WorkflowState> {
        let detail = state.validated_knitting()?;
        let rsn = state.rsn();

        let saved = self.repos.knitting_repo.upsert(detail).await?;
        let total = saved.total();
        self.repos.sample_repo.update_totals(rsn, total).await?;
        tracing::info!(
            rsn,
            size = %saved.size,
            panels = saved.panels.len(),
            weight = total.weight,
            time = total.time,
            "针织明细已保存"
        );

        let next = state.knitting_saved(&saved)?;
        self.handoff(&next);
        Ok(next)
    }

    // ==========================================
    // 配色
    // ==========================================

    /// ColorMatching → Review
    ///
    /// # 参数
    /// - matching_names: 配色名列表，与选中衣片做笛卡尔积
    ///
    /// # 返回
    /// - Ok((WorkflowState, BatchReport)): 全部写入成功，进入复核
    /// - Err(PartialWriteFailure): 部分失败，阶段不前进
    pub async fn submit_color_matching(
        &self,
        state: &WorkflowState,
        matching_names: &[String],
    ) -> WorkflowResult<(WorkflowState, BatchReport)> {
        let (selection, size) = match state.stage_state() {
            StageState::ColorMatching { selection, size } => (selection, size),
            _ => {
                return Err(WorkflowError::InvalidStateTransition {
                    from: state.stage(),
                    to: WorkflowStage::Review,
                })
            }
        };

        let records = build_color_matching_records(
            state.rsn(),
            matching_names,
            selection,
            size,
            &state.context().user_id,
        )?;

        let compensate = self
            .config
            .get_compensate_on_partial_failure()
            .await
            .map_err(|e| WorkflowError::Configuration(e.to_string()))?;
        let coordinator = BatchSubmissionCoordinator::new(compensate);
        let target = ColorMatchingTarget::new(self.repos.color_repo.clone());
        let report = coordinator
            .submit(&target, state.rsn(), state.mode(), records)
            .await?;

        let next = state.color_matching_committed(report.created_keys.clone())?;
        tracing::info!(
            rsn = state.rsn(),
            batch_id = %report.batch_id,
            created = report.created_keys.len(),
            "配色已提交，进入复核"
        );
        Ok((next, report))
    }

    // ==========================================
    // 复核
    // ==========================================

    /// 结束流程，按模式交接到外部页面
    pub fn complete(&self, state: &WorkflowState) -> WorkflowResult<NextRoute> {
        Self::expect_stage(state, WorkflowStage::Review)?;
        let route = state.next_route();
        self.handoff(state);
        let rsn_text = state.rsn().to_string();
        tracing::info!(
            rsn = state.rsn(),
            mode = %state.mode(),
            "{}",
            t_with_args("workflow.completed", &[("rsn", rsn_text.as_str())])
        );
        Ok(route)
    }
}
