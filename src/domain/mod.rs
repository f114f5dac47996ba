// ==========================================
// 针织样品生产跟踪 - 领域模型层
// ==========================================
// 职责: 定义样品、工序、针织明细、配色、衣片选择等实体
// 红线: 不含数据访问逻辑
// ==========================================

pub mod color;
pub mod knitting;
pub mod panel;
pub mod process;
pub mod sample;
pub mod types;

// 重导出核心类型
pub use color::ColorMatching;
pub use knitting::{
    is_record_field_key, is_reserved_key, KnittingDetail, KnittingField, PanelEntry,
    PanelMeasurement, RECORD_FIELD_KEYS, RESERVED_KNITTING_KEYS, USER_ID_KEY,
};
pub use panel::PanelSelection;
pub use process::{
    default_process_catalog, ProcessDraft, ProcessPatch, ProcessRecord, OTHER_PROCESS,
    STANDARD_PROCESS_NAMES,
};
pub use sample::Sample;
pub use types::{FieldViolation, Rsn, Totals, WorkflowMode, WorkflowStage};
