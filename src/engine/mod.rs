// ==========================================
// 针织样品生产跟踪 - 引擎层
// ==========================================
// 职责: 工作流状态机与派生规则，不拼 SQL
// 红线: 引擎只通过仓储 trait 访问数据
// ==========================================

pub mod batch;
pub mod color_id;
pub mod error;
pub mod knitting_entry;
pub mod navigation;
pub mod process_entry;
pub mod repositories;
pub mod totals;
pub mod workflow;
pub mod workflow_engine;

// 重导出核心引擎
pub use batch::{
    build_color_matching_records, BatchReport, BatchSubmissionCoordinator, BatchTarget,
    ColorMatchingTarget,
};
pub use color_id::{derive_color_id, ColorIdError};
pub use error::{WorkflowError, WorkflowResult};
pub use knitting_entry::{KnittingForm, MeasurementField};
pub use navigation::{
    HandoffContext, NavigationHandoff, NextRoute, NoOpNavigation, PanelSelectionProvider,
    StaticPanelSelection,
};
pub use process_entry::ProcessEntryService;
pub use repositories::SampleRepositories;
pub use totals::{aggregate_totals, Measured};
pub use workflow::{StageState, WorkflowContext, WorkflowState};
pub use workflow_engine::SampleWorkflowEngine;
