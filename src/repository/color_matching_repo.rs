// ==========================================
// 针织样品生产跟踪 - 配色数据仓储
// ==========================================
// 主键: color_id
// 红线: Repository 不含业务逻辑（ColorId 由引擎层派生后传入）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{ColorMatching, Rsn};
use crate::repository::entity_repo::ColorMatchingRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 配色仓储
pub struct ColorMatchingRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ColorMatchingRepositoryImpl {
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
impl ColorMatchingRepository for ColorMatchingRepositoryImpl {
    async fn create(&self, record: ColorMatching) -> RepositoryResult<ColorMatching> {
        let conn = self.get_conn()?;
        let now = chrono::Local::now().naive_local();
        conn.execute(
            r#"
            INSERT INTO color_matching (color_id, rsn, matching_name, panel, user_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.color_id,
                record.rsn,
                record.matching_name,
                record.panel,
                record.user_id,
                now,
            ],
        )?;
        Ok(record)
    }

    async fn delete(&self, color_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM color_matching WHERE color_id = ?1",
            params![color_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("color_matching", color_id));
        }
        Ok(())
    }

    async fn delete_by_rsn(&self, rsn: Rsn) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM color_matching WHERE rsn = ?1", params![rsn])?;
        Ok(affected)
    }

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Vec<ColorMatching>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT color_id, rsn, matching_name, panel, user_id
            FROM color_matching
            WHERE rsn = ?1
            ORDER BY color_id
            "#,
        )?;
        let records = stmt
            .query_map(params![rsn], |row| {
                Ok(ColorMatching {
                    color_id: row.get(0)?,
                    rsn: row.get(1)?,
                    matching_name: row.get(2)?,
                    panel: row.get(3)?,
                    user_id: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<ColorMatching>>>()?;
        Ok(records)
    }
}
