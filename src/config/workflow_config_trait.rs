// ==========================================
// 针织样品生产跟踪 - 工作流配置读取 Trait
// ==========================================
// 职责: 定义引擎层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// WorkflowConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait WorkflowConfigReader: Send + Sync {
    /// 调用方未提供用户上下文时使用的用户编号
    ///
    /// # 默认值
    /// - "admin"
    async fn get_default_user_id(&self) -> Result<String, ConfigError>;

    /// 允许录入的工序目录
    ///
    /// # 默认值
    /// - 23 个标准工序（含 Other）
    async fn get_process_catalog(&self) -> Result<Vec<String>, ConfigError>;

    /// 批量写入部分失败时是否删除已写入的记录
    ///
    /// # 默认值
    /// - false（保持非原子、不回滚）
    async fn get_compensate_on_partial_failure(&self) -> Result<bool, ConfigError>;
}
