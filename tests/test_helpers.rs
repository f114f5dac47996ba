// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use knit_sample_tracker::db::{init_schema, open_sqlite_connection};
use knit_sample_tracker::domain::{ColorMatching, Rsn, Sample};
use knit_sample_tracker::engine::SampleRepositories;
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("临时路径不是 UTF-8")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（已开启外键）
pub fn open_test_connection(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 基于临时数据库构建 SQLite 仓储集合
pub fn sqlite_repos(db_path: &str) -> Result<SampleRepositories, Box<dyn Error>> {
    Ok(SampleRepositories::sqlite(open_test_connection(db_path)?))
}

/// 插入样品
pub async fn seed_sample(repos: &SampleRepositories, rsn: Rsn) {
    repos
        .sample_repo
        .create(Sample::new(rsn, Some(format!("ART-{}", rsn))))
        .await
        .expect("seed sample");
}

/// 插入一条配色记录
pub async fn seed_color(repos: &SampleRepositories, rsn: Rsn, color_id: &str, panel: &str) {
    repos
        .color_repo
        .create(ColorMatching {
            color_id: color_id.to_string(),
            rsn,
            matching_name: "Seed".to_string(),
            panel: panel.to_string(),
            user_id: "seed".to_string(),
        })
        .await
        .expect("seed color");
}
