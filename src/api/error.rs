// ==========================================
// 针织样品生产跟踪 - API层错误类型
// ==========================================
// 职责: 将引擎/仓储错误转换为面向用户的错误
// 说明: user_message() 按当前语言输出提示文案
// ==========================================

use crate::engine::error::WorkflowError;
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入 (field={field}): {message}")]
    InvalidInput { field: String, message: String },

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("批量写入部分失败: entity={entity}, failed={failed}/{attempted}, compensated={compensated}")]
    PartialWriteFailure {
        entity: String,
        attempted: usize,
        failed: usize,
        failed_keys: Vec<String>,
        compensated: bool,
    },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("存储不可用: {0}")]
    StorageUnavailable(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 面向用户的提示文案（按当前语言）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidInput { field, message } => t_with_args(
                "error.validation",
                &[("field", field.as_str()), ("message", message.as_str())],
            ),
            ApiError::NotFound(what) => t_with_args("error.not_found", &[("what", what.as_str())]),
            ApiError::BusinessRuleViolation(reason) => {
                t_with_args("error.business_rule", &[("reason", reason.as_str())])
            }
            ApiError::InvalidStateTransition { from, to } => t_with_args(
                "error.invalid_transition",
                &[("from", from.as_str()), ("to", to.as_str())],
            ),
            ApiError::PartialWriteFailure {
                entity,
                attempted,
                failed,
                compensated,
                ..
            } => {
                let key = if *compensated {
                    "error.partial_write_compensated"
                } else {
                    "error.partial_write"
                };
                let attempted = attempted.to_string();
                let failed = failed.to_string();
                t_with_args(
                    key,
                    &[
                        ("entity", entity.as_str()),
                        ("attempted", attempted.as_str()),
                        ("failed", failed.as_str()),
                    ],
                )
            }
            ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::StorageUnavailable(_) => crate::i18n::t("error.storage_unavailable"),
            ApiError::ConfigError(reason) => {
                t_with_args("error.config", &[("reason", reason.as_str())])
            }
            ApiError::InternalError(_) | ApiError::Other(_) => crate::i18n::t("error.internal"),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput { field, message }
            }
            RepositoryError::Unavailable(msg) => ApiError::StorageUnavailable(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 WorkflowError 转换
// ==========================================
impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation { field, message } => {
                ApiError::InvalidInput { field, message }
            }
            WorkflowError::PartialWriteFailure {
                entity,
                attempted,
                failed,
                failed_keys,
                compensated,
                ..
            } => ApiError::PartialWriteFailure {
                entity,
                attempted,
                failed,
                failed_keys,
                compensated,
            },
            WorkflowError::RepositoryUnavailable(e) => e.into(),
            WorkflowError::InvalidStateTransition { from, to } => ApiError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
            WorkflowError::Configuration(msg) => ApiError::ConfigError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
