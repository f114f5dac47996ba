// ==========================================
// 针织样品生产跟踪 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod workflow_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_USER_ID};
pub use workflow_config_trait::{ConfigError, WorkflowConfigReader};
