// ==========================================
// 针织样品生产跟踪 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::workflow_config_trait::{ConfigError, WorkflowConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::default_process_catalog;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    // 用户
    pub const DEFAULT_USER_ID: &str = "workflow/default_user_id";

    // 工序
    pub const PROCESS_CATALOG: &str = "workflow/process_catalog";

    // 批量写入
    pub const COMPENSATE_ON_PARTIAL_FAILURE: &str = "batch/compensate_on_partial_failure";
}

/// 默认用户编号
pub const DEFAULT_USER_ID: &str = "admin";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> Result<HashMap<String, String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl WorkflowConfigReader for ConfigManager {
    async fn get_default_user_id(&self) -> Result<String, ConfigError> {
        let value = self
            .get_config_value(config_keys::DEFAULT_USER_ID)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
        Ok(value)
    }

    async fn get_process_catalog(&self) -> Result<Vec<String>, ConfigError> {
        match self.get_config_value(config_keys::PROCESS_CATALOG)? {
            Some(raw) => {
                let catalog: Vec<String> = serde_json::from_str(&raw)?;
                if catalog.is_empty() {
                    tracing::warn!("工序目录配置为空，回退到标准目录");
                    return Ok(default_process_catalog());
                }
                Ok(catalog)
            }
            None => Ok(default_process_catalog()),
        }
    }

    async fn get_compensate_on_partial_failure(&self) -> Result<bool, ConfigError> {
        match self.get_config_value(config_keys::COMPENSATE_ON_PARTIAL_FAILURE)? {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                other => Err(format!(
                    "配置值格式错误 (key: {}, value: {})",
                    config_keys::COMPENSATE_ON_PARTIAL_FAILURE,
                    other
                )
                .into()),
            },
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.get_default_user_id().await.unwrap(), "admin");
        assert_eq!(config.get_process_catalog().await.unwrap().len(), 23);
        assert!(!config.get_compensate_on_partial_failure().await.unwrap());
    }

    #[tokio::test]
    async fn test_overrides() {
        let config = manager();
        config.set_config_value(config_keys::DEFAULT_USER_ID, "planner").unwrap();
        config
            .set_config_value(config_keys::PROCESS_CATALOG, r#"["Linking","Other"]"#)
            .unwrap();
        config
            .set_config_value(config_keys::COMPENSATE_ON_PARTIAL_FAILURE, "true")
            .unwrap();

        assert_eq!(config.get_default_user_id().await.unwrap(), "planner");
        assert_eq!(
            config.get_process_catalog().await.unwrap(),
            vec!["Linking".to_string(), "Other".to_string()]
        );
        assert!(config.get_compensate_on_partial_failure().await.unwrap());
        assert_eq!(config.get_config_snapshot().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_bad_bool_is_error() {
        let config = manager();
        config
            .set_config_value(config_keys::COMPENSATE_ON_PARTIAL_FAILURE, "maybe")
            .unwrap();
        assert!(config.get_compensate_on_partial_failure().await.is_err());
    }
}
