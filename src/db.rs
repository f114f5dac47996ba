// ==========================================
// 针织样品生产跟踪 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 提供建表脚本，保证"无 RSN 不建档"由外键兜底
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS sample (
            rsn INTEGER PRIMARY KEY,
            article_no TEXT,
            total_weight REAL NOT NULL DEFAULT 0,
            total_time REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS process (
            rsn INTEGER NOT NULL REFERENCES sample(rsn),
            process_name TEXT NOT NULL,
            emp_id TEXT NOT NULL,
            yarn_used TEXT NOT NULL DEFAULT '',
            yarn_cost REAL NOT NULL DEFAULT 0,
            material2 TEXT NOT NULL DEFAULT '',
            material2_cost REAL NOT NULL DEFAULT 0,
            manpower_cost REAL NOT NULL DEFAULT 0,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (rsn, process_name)
        );

        CREATE TABLE IF NOT EXISTS knitting_detail (
            rsn INTEGER PRIMARY KEY REFERENCES sample(rsn),
            size TEXT NOT NULL,
            record_json TEXT NOT NULL,
            total_weight REAL NOT NULL,
            total_time REAL NOT NULL,
            user_id TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS color_matching (
            color_id TEXT PRIMARY KEY,
            rsn INTEGER NOT NULL REFERENCES sample(rsn),
            matching_name TEXT NOT NULL,
            panel TEXT NOT NULL,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_color_matching_rsn ON color_matching(rsn);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "KNIT_SAMPLE_DB_PATH";

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 KNIT_SAMPLE_DB_PATH 非空时直接使用
/// - 否则: 用户数据目录/knit-sample-tracker/knit_sample.db
/// - 取不到用户数据目录时回退到 ./knit_sample.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./knit_sample.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("knit-sample-tracker");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "创建数据目录失败，使用当前目录");
        } else {
            path = dir.join("knit_sample.db");
        }
    }
    path.to_string_lossy().to_string()
}
