// ==========================================
// 针织样品生产跟踪 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 核心: 样品工作流引擎（工序 → 衣片 → 针织 → 配色 → 复核）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 工作流与派生规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FieldViolation, Rsn, Totals, WorkflowMode, WorkflowStage};

// 领域实体
pub use domain::{
    ColorMatching, KnittingDetail, PanelMeasurement, PanelSelection, ProcessDraft, ProcessRecord,
    Sample,
};

// 引擎
pub use engine::{
    derive_color_id, BatchSubmissionCoordinator, SampleRepositories, SampleWorkflowEngine,
    WorkflowError, WorkflowState,
};

// API
pub use api::{ApiError, SampleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "针织样品生产跟踪";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
