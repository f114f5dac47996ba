// ==========================================
// 针织样品生产跟踪 - 外部协作者接口
// ==========================================
// 职责: 定义导航交接与衣片选择两个外部协作者 trait
// 说明: 引擎层只决定"去哪"，具体路由表由外部实现
// ==========================================

use crate::domain::panel::PanelSelection;
use crate::domain::types::{Rsn, WorkflowMode, WorkflowStage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 下一跳路由
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextRoute {
    /// 进入工作流的下一阶段
    Stage { stage: WorkflowStage, rsn: Rsn },
    /// 配色展示页（AddUpdate 完成后）
    ColorDisplay { rsn: Rsn },
    /// 样品展示页（Update 完成后）
    SampleDisplay { rsn: Rsn },
    /// 新样品录入页（Add 完成后）
    NewSampleEntry,
}

impl NextRoute {
    /// 复核阶段结束后的去向
    pub fn after_review(mode: WorkflowMode, rsn: Rsn) -> Self {
        match mode {
            WorkflowMode::AddUpdate => NextRoute::ColorDisplay { rsn },
            WorkflowMode::Update => NextRoute::SampleDisplay { rsn },
            WorkflowMode::Add => NextRoute::NewSampleEntry,
        }
    }
}

/// 交接上下文：跨阶段显式传递的全部输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffContext {
    pub rsn: Rsn,
    pub mode: WorkflowMode,
    pub selection: Option<PanelSelection>,
    pub size: Option<String>,
}

// ==========================================
// NavigationHandoff Trait
// ==========================================
pub trait NavigationHandoff: Send + Sync {
    /// 阶段完成后交接到下一路由
    fn handoff(&self, route: NextRoute, context: HandoffContext);
}

/// 空操作导航（单元测试/无界面场景）
#[derive(Debug, Clone, Default)]
pub struct NoOpNavigation;

impl NavigationHandoff for NoOpNavigation {
    fn handoff(&self, route: NextRoute, context: HandoffContext) {
        tracing::debug!(
            rsn = context.rsn,
            mode = %context.mode,
            route = ?route,
            "NoOpNavigation: 跳过导航交接"
        );
    }
}

// ==========================================
// PanelSelectionProvider Trait
// ==========================================
// 由外部衣片选择界面实现
pub trait PanelSelectionProvider: Send + Sync {
    /// 衣片名 → 是否选中
    fn panel_selection(&self, rsn: Rsn) -> BTreeMap<String, bool>;
}

/// 固定选择集（测试或批处理导入时使用）
#[derive(Debug, Clone, Default)]
pub struct StaticPanelSelection {
    states: BTreeMap<String, bool>,
}

impl StaticPanelSelection {
    pub fn new(states: BTreeMap<String, bool>) -> Self {
        Self { states }
    }

    pub fn selecting<I, S>(panels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            states: panels.into_iter().map(|p| (p.into(), true)).collect(),
        }
    }
}

impl PanelSelectionProvider for StaticPanelSelection {
    fn panel_selection(&self, _rsn: Rsn) -> BTreeMap<String, bool> {
        self.states.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_review_by_mode() {
        assert_eq!(
            NextRoute::after_review(WorkflowMode::AddUpdate, 74),
            NextRoute::ColorDisplay { rsn: 74 }
        );
        assert_eq!(
            NextRoute::after_review(WorkflowMode::Update, 74),
            NextRoute::SampleDisplay { rsn: 74 }
        );
        assert_eq!(
            NextRoute::after_review(WorkflowMode::Add, 74),
            NextRoute::NewSampleEntry
        );
    }

    #[test]
    fn test_static_selection() {
        let provider = StaticPanelSelection::selecting(["Front", "Back"]);
        let states = provider.panel_selection(1);
        assert_eq!(states.len(), 2);
        assert!(states.values().all(|v| *v));
    }
}
