// ==========================================
// 针织样品生产跟踪 - 工序数据仓储
// ==========================================
// 主键: (rsn, process_name)
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{ProcessPatch, ProcessRecord, Rsn};
use crate::repository::entity_repo::ProcessRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT rsn, process_name, emp_id, yarn_used, yarn_cost,
           material2, material2_cost, manpower_cost, user_id
    FROM process
"#;

/// 工序仓储
/// 职责: 管理 process 表的 CRUD 操作
pub struct ProcessRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProcessRepositoryImpl {
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

    fn map_row(row: &Row) -> SqliteResult<ProcessRecord> {
        Ok(ProcessRecord {
            rsn: row.get(0)?,
            process_name: row.get(1)?,
            employee_id: row.get(2)?,
            yarn_used: row.get(3)?,
            yarn_cost: row.get(4)?,
            material2: row.get(5)?,
            material2_cost: row.get(6)?,
            manpower_cost: row.get(7)?,
            user_id: row.get(8)?,
        })
    }
}

#[async_trait]
impl ProcessRepository for ProcessRepositoryImpl {
    async fn create(&self, record: ProcessRecord) -> RepositoryResult<ProcessRecord> {
        let conn = self.get_conn()?;
        let now = chrono::Local::now().naive_local();
        conn.execute(
            r#"
            INSERT INTO process (
                rsn, process_name, emp_id, yarn_used, yarn_cost,
                material2, material2_cost, manpower_cost, user_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
            params![
                record.rsn,
                record.process_name,
                record.employee_id,
                record.yarn_used,
                record.yarn_cost,
                record.material2,
                record.material2_cost,
                record.manpower_cost,
                record.user_id,
                now,
            ],
        )?;
        Ok(record)
    }

    async fn update(
        &self,
        rsn: Rsn,
        process_name: &str,
        patch: ProcessPatch,
    ) -> RepositoryResult<ProcessRecord> {
        let conn = self.get_conn()?;
        let now = chrono::Local::now().naive_local();
        let affected = conn.execute(
            r#"
            UPDATE process
            SET emp_id = ?3, yarn_used = ?4, yarn_cost = ?5, material2 = ?6,
                material2_cost = ?7, manpower_cost = ?8, user_id = ?9, updated_at = ?10
            WHERE rsn = ?1 AND process_name = ?2
            "#,
            params![
                rsn,
                process_name,
                patch.employee_id,
                patch.yarn_used,
                patch.yarn_cost,
                patch.material2,
                patch.material2_cost,
                patch.manpower_cost,
                patch.user_id,
                now,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found(
                "process",
                format!("{}/{}", rsn, process_name),
            ));
        }

        let sql = format!("{} WHERE rsn = ?1 AND process_name = ?2", SELECT_COLUMNS);
        conn.query_row(&sql, params![rsn, process_name], Self::map_row)
            .optional()?
            .ok_or_else(|| RepositoryError::not_found("process", format!("{}/{}", rsn, process_name)))
    }

    async fn delete(&self, rsn: Rsn, process_name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM process WHERE rsn = ?1 AND process_name = ?2",
            params![rsn, process_name],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found(
                "process",
                format!("{}/{}", rsn, process_name),
            ));
        }
        Ok(())
    }

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Vec<ProcessRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE rsn = ?1 ORDER BY created_at, process_name", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![rsn], Self::map_row)?
            .collect::<SqliteResult<Vec<ProcessRecord>>>()?;
        Ok(records)
    }
}
