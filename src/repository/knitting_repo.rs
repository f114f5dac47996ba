// ==========================================
// 针织样品生产跟踪 - 针织明细数据仓储
// ==========================================
// 存储: knitting_detail 表，record_json 保存动态记录形态
// 读取时合计由衣片重新计算，total_* 列仅供列表查询
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{KnittingDetail, Rsn};
use crate::repository::entity_repo::KnittingRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 针织明细仓储
pub struct KnittingRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl KnittingRepositoryImpl {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl KnittingRepository for KnittingRepositoryImpl {
    async fn upsert(&self, detail: KnittingDetail) -> RepositoryResult<KnittingDetail> {
        let conn = self.get_conn()?;
        let record_json = serde_json::to_string(&detail.to_record_json())?;
        let total = detail.total();
        let now = chrono::Local::now().naive_local();

        conn.execute(
            r#"
            INSERT INTO knitting_detail (
                rsn, size, record_json, total_weight, total_time, user_id, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(rsn) DO UPDATE SET
                size = excluded.size,
                record_json = excluded.record_json,
                total_weight = excluded.total_weight,
                total_time = excluded.total_time,
                user_id = excluded.user_id,
                updated_at = excluded.updated_at
            "#,
            params![
                detail.rsn,
                detail.size,
                record_json,
                total.weight,
                total.time,
                detail.user_id,
                now,
            ],
        )?;

        tracing::debug!(
            rsn = detail.rsn,
            panels = detail.panels.len(),
            total_weight = total.weight,
            total_time = total.time,
            "针织明细已写入"
        );
        Ok(detail)
    }

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Option<KnittingDetail>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT record_json FROM knitting_detail WHERE rsn = ?1",
                params![rsn],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => {
                let value: serde_json::Value = serde_json::from_str(&raw)?;
                let detail = KnittingDetail::from_record_json(&value).map_err(|v| {
                    RepositoryError::FieldValueError {
                        field: v.field,
                        message: v.message,
                    }
                })?;
                Ok(Some(detail))
            }
            None => Ok(None),
        }
    }
}
