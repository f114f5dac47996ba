// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use knit_sample_tracker::config::{ConfigError, WorkflowConfigReader};
use knit_sample_tracker::domain::default_process_catalog;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub default_user_id: String,
    pub process_catalog: Vec<String>,
    pub compensate_on_partial_failure: bool,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            default_user_id: "tester".to_string(),
            process_catalog: default_process_catalog(),
            compensate_on_partial_failure: false,
        }
    }

    /// 开启部分失败补偿
    pub fn compensating() -> Self {
        let mut config = Self::default();
        config.compensate_on_partial_failure = true;
        config
    }
}

#[async_trait]
impl WorkflowConfigReader for MockConfig {
    async fn get_default_user_id(&self) -> Result<String, ConfigError> {
        Ok(self.default_user_id.clone())
    }

    async fn get_process_catalog(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.process_catalog.clone())
    }

    async fn get_compensate_on_partial_failure(&self) -> Result<bool, ConfigError> {
        Ok(self.compensate_on_partial_failure)
    }
}
