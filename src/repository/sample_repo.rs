// ==========================================
// 针织样品生产跟踪 - 样品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Rsn, Sample, Totals};
use crate::repository::entity_repo::SampleRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SampleRepositoryImpl - 样品仓储
// ==========================================

/// 样品仓储
/// 职责: 管理 sample 表的 CRUD 操作
pub struct SampleRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl SampleRepositoryImpl {
    /// 创建新的样品仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> SqliteResult<Sample> {
        Ok(Sample {
            rsn: row.get(0)?,
            article_no: row.get(1)?,
            total: Totals::new(row.get(2)?, row.get(3)?),
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn find_sync(conn: &Connection, rsn: Rsn) -> RepositoryResult<Option<Sample>> {
        let sample = conn
            .query_row(
                r#"
                SELECT rsn, article_no, total_weight, total_time, created_at, updated_at
                FROM sample
                WHERE rsn = ?1
                "#,
                params![rsn],
                Self::map_row,
            )
            .optional()?;
        Ok(sample)
    }
}

#[async_trait]
impl SampleRepository for SampleRepositoryImpl {
    async fn create(&self, sample: Sample) -> RepositoryResult<Sample> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO sample (rsn, article_no, total_weight, total_time, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                sample.rsn,
                sample.article_no,
                sample.total.weight,
                sample.total.time,
                sample.created_at,
                sample.updated_at,
            ],
        )?;
        tracing::debug!(rsn = sample.rsn, "样品已建档");
        Ok(sample)
    }

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Option<Sample>> {
        let conn = self.get_conn()?;
        Self::find_sync(&conn, rsn)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Sample>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT rsn, article_no, total_weight, total_time, created_at, updated_at
            FROM sample
            ORDER BY rsn
            "#,
        )?;
        let samples = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Sample>>>()?;
        Ok(samples)
    }

    async fn update_totals(&self, rsn: Rsn, totals: Totals) -> RepositoryResult<Sample> {
        let conn = self.get_conn()?;
        let now = chrono::Local::now().naive_local();
        let affected = conn.execute(
            r#"
            UPDATE sample
            SET total_weight = ?2, total_time = ?3, updated_at = ?4
            WHERE rsn = ?1
            "#,
            params![rsn, totals.weight, totals.time, now],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("sample", rsn));
        }
        Self::find_sync(&conn, rsn)?.ok_or_else(|| RepositoryError::not_found("sample", rsn))
    }
}
