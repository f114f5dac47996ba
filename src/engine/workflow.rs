// ==========================================
// 针织样品生产跟踪 - 工作流状态机
// ==========================================
// 阶段: ProcessEntry → PanelSelection → KnittingEntry → ColorMatching → Review
// 每个事件产生新的状态值，失败时旧状态原样保留
// 跨阶段输入 (RSN/模式/衣片选择集/尺码) 全部显式携带
// Update 流程可在 PanelSelection 重新进入
// ==========================================

use crate::domain::knitting::KnittingDetail;
use crate::domain::panel::PanelSelection;
use crate::domain::types::{Rsn, WorkflowMode, WorkflowStage};
use crate::engine::error::{WorkflowError, WorkflowResult};
use crate::engine::knitting_entry::{KnittingForm, MeasurementField};
use crate::engine::navigation::{HandoffContext, NextRoute};

/// 工作流上下文（整个流程内不变）
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowContext {
    pub rsn: Rsn,
    pub mode: WorkflowMode,
    pub user_id: String,
}

impl WorkflowContext {
    pub fn new(rsn: Rsn, mode: WorkflowMode, user_id: impl Into<String>) -> Self {
        Self {
            rsn,
            mode,
            user_id: user_id.into(),
        }
    }
}

// ==========================================
// StageState - 各阶段携带的数据
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum StageState {
    ProcessEntry {
        /// 本次流程内已保存的工序名
        saved_processes: Vec<String>,
    },
    PanelSelection,
    KnittingEntry {
        selection: PanelSelection,
        form: KnittingForm,
    },
    ColorMatching {
        selection: PanelSelection,
        size: String,
    },
    Review {
        selection: PanelSelection,
        size: String,
        color_ids: Vec<String>,
    },
}

impl StageState {
    pub fn stage(&self) -> WorkflowStage {
        match self {
            StageState::ProcessEntry { .. } => WorkflowStage::ProcessEntry,
            StageState::PanelSelection => WorkflowStage::PanelSelection,
            StageState::KnittingEntry { .. } => WorkflowStage::KnittingEntry,
            StageState::ColorMatching { .. } => WorkflowStage::ColorMatching,
            StageState::Review { .. } => WorkflowStage::Review,
        }
    }
}

// ==========================================
// WorkflowState - 不可变状态值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    context: WorkflowContext,
    stage: StageState,
}

impl WorkflowState {
    /// 从工序录入开始
    pub fn start(context: WorkflowContext) -> Self {
        Self {
            context,
            stage: StageState::ProcessEntry {
                saved_processes: Vec::new(),
            },
        }
    }

    /// 直接在衣片选择阶段进入（Update 流程重新进入）
    pub fn reenter_at_panel_selection(context: WorkflowContext) -> Self {
        Self {
            context,
            stage: StageState::PanelSelection,
        }
    }

    pub fn context(&self) -> &WorkflowContext {
        &self.context
    }

    pub fn rsn(&self) -> Rsn {
        self.context.rsn
    }

    pub fn mode(&self) -> WorkflowMode {
        self.context.mode
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage.stage()
    }

    pub fn stage_state(&self) -> &StageState {
        &self.stage
    }

    /// 当前衣片选择集（仅 KnittingEntry 之后的阶段有值）
    pub fn selection(&self) -> Option<&PanelSelection> {
        match &self.stage {
            StageState::KnittingEntry { selection, .. }
            | StageState::ColorMatching { selection, .. }
            | StageState::Review { selection, .. } => Some(selection),
            _ => None,
        }
    }

    /// 当前尺码（KnittingEntry 阶段取表单中的值）
    pub fn size(&self) -> Option<&str> {
        match &self.stage {
            StageState::KnittingEntry { form, .. } => Some(form.size()),
            StageState::ColorMatching { size, .. } | StageState::Review { size, .. } => {
                Some(size.as_str())
            }
            _ => None,
        }
    }

    /// 当前针织表单
    pub fn knitting_form(&self) -> Option<&KnittingForm> {
        match &self.stage {
            StageState::KnittingEntry { form, .. } => Some(form),
            _ => None,
        }
    }

    /// 复核阶段已写入的配色编号
    pub fn color_ids(&self) -> Option<&[String]> {
        match &self.stage {
            StageState::Review { color_ids, .. } => Some(color_ids),
            _ => None,
        }
    }

    fn with_stage(&self, stage: StageState) -> Self {
        Self {
            context: self.context.clone(),
            stage,
        }
    }

    fn transition_error(&self, to: WorkflowStage) -> WorkflowError {
        WorkflowError::InvalidStateTransition {
            from: self.stage(),
            to,
        }
    }

    // ==========================================
    // 工序录入
    // ==========================================

    /// 记录一行工序已保存
    pub fn record_process_saved(&self, process_name: &str) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::ProcessEntry { saved_processes } => {
                let mut saved = saved_processes.clone();
                if !saved.iter().any(|p| p == process_name) {
                    saved.push(process_name.to_string());
                }
                Ok(self.with_stage(StageState::ProcessEntry {
                    saved_processes: saved,
                }))
            }
            _ => Err(self.transition_error(WorkflowStage::ProcessEntry)),
        }
    }

    /// 记录一行工序已删除
    pub fn record_process_deleted(&self, process_name: &str) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::ProcessEntry { saved_processes } => {
                let saved = saved_processes
                    .iter()
                    .filter(|p| p.as_str() != process_name)
                    .cloned()
                    .collect();
                Ok(self.with_stage(StageState::ProcessEntry {
                    saved_processes: saved,
                }))
            }
            _ => Err(self.transition_error(WorkflowStage::ProcessEntry)),
        }
    }

    /// 本次流程内已保存（且未删除）的工序名
    pub fn saved_processes(&self) -> &[String] {
        match &self.stage {
            StageState::ProcessEntry { saved_processes } => saved_processes,
            _ => &[],
        }
    }

    /// ProcessEntry → PanelSelection
    ///
    /// # 参数
    /// - stored_process_count: 存储中该 RSN 当前的工序行数
    ///
    /// 以存储为准：删除后归零的 RSN 不能前进
    pub fn advance_to_panel_selection(&self, stored_process_count: usize) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::ProcessEntry { .. } => {
                if stored_process_count == 0 {
                    return Err(WorkflowError::validation(
                        "ProcessName",
                        "至少需要保存一条工序后才能继续",
                    ));
                }
                Ok(self.with_stage(StageState::PanelSelection))
            }
            _ => Err(self.transition_error(WorkflowStage::PanelSelection)),
        }
    }

    // ==========================================
    // 衣片选择
    // ==========================================

    /// PanelSelection → KnittingEntry
    ///
    /// # 参数
    /// - selection: 外部选择界面产生的选择集
    /// - existing: 已有针织明细（Update 模式用于预填）
    pub fn select_panels(
        &self,
        selection: PanelSelection,
        existing: Option<&KnittingDetail>,
    ) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::PanelSelection => {
                if !selection.has_selection() {
                    return Err(WorkflowError::validation("Panel", "至少需要选择一个衣片"));
                }
                let form = KnittingForm::prefilled(self.context.rsn, &selection, existing);
                Ok(self.with_stage(StageState::KnittingEntry { selection, form }))
            }
            _ => Err(self.transition_error(WorkflowStage::KnittingEntry)),
        }
    }

    /// 回到衣片选择（Update 流程可从任意后续阶段重新选择）
    pub fn revisit_panel_selection(&self) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::ProcessEntry { .. } => {
                Err(self.transition_error(WorkflowStage::PanelSelection))
            }
            _ => Ok(self.with_stage(StageState::PanelSelection)),
        }
    }

    // ==========================================
    // 针织录入
    // ==========================================

    /// 编辑针织表单字段；失败时状态不变
    pub fn edit_knitting(
        &self,
        panel: &str,
        field: MeasurementField,
        value: &str,
    ) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::KnittingEntry { selection, form } => {
                let form = form.edit(panel, field, value)?;
                Ok(self.with_stage(StageState::KnittingEntry {
                    selection: selection.clone(),
                    form,
                }))
            }
            _ => Err(self.transition_error(WorkflowStage::KnittingEntry)),
        }
    }

    pub fn set_size(&self, size: &str) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::KnittingEntry { selection, form } => {
                Ok(self.with_stage(StageState::KnittingEntry {
                    selection: selection.clone(),
                    form: form.with_size(size),
                }))
            }
            _ => Err(self.transition_error(WorkflowStage::KnittingEntry)),
        }
    }

    /// 校验针织表单并生成待写入明细（不改变状态）
    pub fn validated_knitting(&self) -> WorkflowResult<KnittingDetail> {
        match &self.stage {
            StageState::KnittingEntry { form, .. } => Ok(form.validate(&self.context.user_id)?),
            _ => Err(self.transition_error(WorkflowStage::ColorMatching)),
        }
    }

    /// KnittingEntry → ColorMatching（针织明细已写入后调用）
    pub fn knitting_saved(&self, detail: &KnittingDetail) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::KnittingEntry { selection, .. } => {
                Ok(self.with_stage(StageState::ColorMatching {
                    selection: selection.clone(),
                    size: detail.size.clone(),
                }))
            }
            _ => Err(self.transition_error(WorkflowStage::ColorMatching)),
        }
    }

    // ==========================================
    // 配色
    // ==========================================

    /// ColorMatching → Review（批量写入全部成功后调用）
    pub fn color_matching_committed(&self, color_ids: Vec<String>) -> WorkflowResult<Self> {
        match &self.stage {
            StageState::ColorMatching { selection, size } => Ok(self.with_stage(StageState::Review {
                selection: selection.clone(),
                size: size.clone(),
                color_ids,
            })),
            _ => Err(self.transition_error(WorkflowStage::Review)),
        }
    }

    // ==========================================
    // 交接
    // ==========================================

    /// 当前阶段完成后的下一跳
    pub fn next_route(&self) -> NextRoute {
        let rsn = self.context.rsn;
        match self.stage() {
            WorkflowStage::Review => NextRoute::after_review(self.context.mode, rsn),
            stage => NextRoute::Stage { stage, rsn },
        }
    }

    /// 交接给外部导航的上下文
    pub fn handoff_context(&self) -> HandoffContext {
        HandoffContext {
            rsn: self.context.rsn,
            mode: self.context.mode,
            selection: self.selection().cloned(),
            size: self.size().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Totals;

    fn ctx(mode: WorkflowMode) -> WorkflowContext {
        WorkflowContext::new(74, mode, "u1")
    }

    fn at_knitting(mode: WorkflowMode) -> WorkflowState {
        WorkflowState::reenter_at_panel_selection(ctx(mode))
            .select_panels(PanelSelection::of(["Front", "Back"]).unwrap(), None)
            .unwrap()
    }

    fn filled(state: WorkflowState) -> WorkflowState {
        let mut s = state.set_size("M").unwrap();
        for panel in ["Front", "Back"] {
            s = s.edit_knitting(panel, MeasurementField::Weight, "10").unwrap();
            s = s.edit_knitting(panel, MeasurementField::Time, "2").unwrap();
            s = s.edit_knitting(panel, MeasurementField::MachineNo, "K1").unwrap();
        }
        s
    }

    #[test]
    fn test_process_entry_requires_saved_row() {
        let state = WorkflowState::start(ctx(WorkflowMode::Add));
        let err = state.advance_to_panel_selection(0).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(state.stage(), WorkflowStage::ProcessEntry);

        let saved = state.record_process_saved("Linking").unwrap();
        assert_eq!(saved.saved_processes(), ["Linking".to_string()]);
        let next = saved.advance_to_panel_selection(1).unwrap();
        assert_eq!(next.stage(), WorkflowStage::PanelSelection);
        assert_eq!(next.rsn(), 74);
        assert_eq!(next.mode(), WorkflowMode::Add);
    }

    #[test]
    fn test_deleted_row_no_longer_counts() {
        let state = WorkflowState::start(ctx(WorkflowMode::Add))
            .record_process_saved("Linking")
            .unwrap()
            .record_process_deleted("Linking")
            .unwrap();
        assert!(state.saved_processes().is_empty());
        assert!(state.advance_to_panel_selection(0).unwrap_err().is_validation());
    }

    #[test]
    fn test_existing_rows_allow_advance() {
        let state = WorkflowState::start(ctx(WorkflowMode::Update));
        assert!(state.advance_to_panel_selection(2).is_ok());
    }

    #[test]
    fn test_empty_selection_rejected() {
        let state = WorkflowState::reenter_at_panel_selection(ctx(WorkflowMode::Add));
        let selection = PanelSelection::of(Vec::<String>::new()).unwrap();
        let err = state.select_panels(selection, None).unwrap_err();
        assert_eq!(err.field(), Some("Panel"));
    }

    #[test]
    fn test_blank_field_keeps_state() {
        let state = at_knitting(WorkflowMode::Add).set_size("M").unwrap();
        let err = state.validated_knitting().unwrap_err();
        assert_eq!(err.field(), Some("Back.Weight"));
        assert_eq!(state.stage(), WorkflowStage::KnittingEntry);
    }

    #[test]
    fn test_negative_edit_keeps_previous_state() {
        let state = at_knitting(WorkflowMode::Add)
            .edit_knitting("Front", MeasurementField::Weight, "5")
            .unwrap();
        assert!(state
            .edit_knitting("Front", MeasurementField::Weight, "-5")
            .is_err());
        assert_eq!(
            state.knitting_form().unwrap().total(),
            Totals::new(5.0, 0.0)
        );
    }

    #[test]
    fn test_full_forward_path() {
        let state = filled(at_knitting(WorkflowMode::AddUpdate));
        let detail = state.validated_knitting().unwrap();
        assert_eq!(detail.user_id, "u1");

        let state = state.knitting_saved(&detail).unwrap();
        assert_eq!(state.stage(), WorkflowStage::ColorMatching);
        assert_eq!(state.size(), Some("M"));
        assert_eq!(
            state.next_route(),
            NextRoute::Stage {
                stage: WorkflowStage::ColorMatching,
                rsn: 74
            }
        );

        let state = state
            .color_matching_committed(vec!["F74NAYM".into()])
            .unwrap();
        assert_eq!(state.stage(), WorkflowStage::Review);
        assert_eq!(state.color_ids().unwrap().len(), 1);
        assert_eq!(state.next_route(), NextRoute::ColorDisplay { rsn: 74 });

        let handoff = state.handoff_context();
        assert_eq!(handoff.size.as_deref(), Some("M"));
        assert_eq!(handoff.selection.unwrap().selected(), vec!["Back", "Front"]);
    }

    #[test]
    fn test_wrong_stage_is_invalid_transition() {
        let state = WorkflowState::start(ctx(WorkflowMode::Add));
        let err = state.color_matching_committed(vec![]).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidStateTransition {
                from: WorkflowStage::ProcessEntry,
                to: WorkflowStage::Review
            }
        ));
        assert!(state.revisit_panel_selection().is_err());
    }

    #[test]
    fn test_update_can_revisit_panel_selection() {
        let state = filled(at_knitting(WorkflowMode::Update));
        let detail = state.validated_knitting().unwrap();
        let state = state.knitting_saved(&detail).unwrap();
        let again = state.revisit_panel_selection().unwrap();
        assert_eq!(again.stage(), WorkflowStage::PanelSelection);
        assert_eq!(again.mode(), WorkflowMode::Update);
    }
}
