// ==========================================
// 针织样品生产跟踪 - 引擎层错误类型
// ==========================================
// 错误分类:
// - Validation: 字段级校验失败，阻断阶段转换，不产生任何写入
// - PartialWriteFailure: 批量写入部分失败，已写入记录默认不回滚
// - RepositoryUnavailable: 任一 CRUD 调用失败，阶段不前进，表单保留可重试
// 所有错误均可在阶段边界通过重新提交恢复
// ==========================================

use crate::domain::types::{FieldViolation, WorkflowStage};
use crate::engine::color_id::ColorIdError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("数据验证失败 (field={field}): {message}")]
    Validation { field: String, message: String },

    #[error(
        "批量写入部分失败: entity={entity}, attempted={attempted}, failed={failed}, compensated={compensated}, first_error={first_error}"
    )]
    PartialWriteFailure {
        entity: String,
        attempted: usize,
        failed: usize,
        failed_keys: Vec<String>,
        first_error: String,
        /// 是否已删除本批次中成功写入的记录
        compensated: bool,
    },

    #[error("存储不可用: {0}")]
    RepositoryUnavailable(#[from] RepositoryError),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition {
        from: WorkflowStage,
        to: WorkflowStage,
    },

    #[error("配置读取失败: {0}")]
    Configuration(String),
}

impl WorkflowError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::Validation { .. })
    }

    /// 校验失败时的字段名
    pub fn field(&self) -> Option<&str> {
        match self {
            WorkflowError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<FieldViolation> for WorkflowError {
    fn from(v: FieldViolation) -> Self {
        WorkflowError::Validation {
            field: v.field,
            message: v.message,
        }
    }
}

impl From<ColorIdError> for WorkflowError {
    fn from(err: ColorIdError) -> Self {
        match err {
            ColorIdError::InvalidInput { field, reason } => WorkflowError::Validation {
                field: field.to_string(),
                message: reason,
            },
        }
    }
}

/// Result 类型别名
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_violation_becomes_validation() {
        let err: WorkflowError = FieldViolation::new("Front.Weight", "不能为空").into();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("Front.Weight"));
    }

    #[test]
    fn test_repository_error_becomes_unavailable() {
        let err: WorkflowError = RepositoryError::Unavailable("timeout".into()).into();
        assert!(matches!(err, WorkflowError::RepositoryUnavailable(_)));
        assert_eq!(err.field(), None);
    }
}
