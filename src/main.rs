// ==========================================
// 针织样品生产跟踪 - 命令行入口
// ==========================================
// 用法:
//   knit-sample-tracker                 列出全部样品
//   knit-sample-tracker show <RSN>      输出单个样品汇总 (JSON)
//   knit-sample-tracker new <RSN> [款号] 新建样品档案
// 数据库路径: KNIT_SAMPLE_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{bail, Context, Result};
use knit_sample_tracker::api::SampleApi;
use knit_sample_tracker::db::{get_default_db_path, init_schema, open_sqlite_connection};
use knit_sample_tracker::engine::SampleRepositories;
use knit_sample_tracker::{logging, Rsn, APP_NAME, VERSION};
use std::sync::{Arc, Mutex};

fn parse_rsn(raw: Option<String>) -> Result<Rsn> {
    let raw = raw.context("缺少 RSN 参数")?;
    raw.trim()
        .parse::<Rsn>()
        .with_context(|| format!("RSN 不是有效整数: {}", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    tracing::info!("{} v{}", APP_NAME, VERSION);

    let db_path = get_default_db_path();
    tracing::info!(db_path = %db_path, "使用数据库");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("建表失败")?;

    let api = SampleApi::new(SampleRepositories::sqlite(Arc::new(Mutex::new(conn))));

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None | Some("list") => {
            let samples = api
                .list_samples()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{:>8}  {:<16}  {:>10}  {:>10}", "RSN", "ArticleNo", "Weight", "Time");
            for s in samples {
                println!(
                    "{:>8}  {:<16}  {:>10.2}  {:>10.2}",
                    s.rsn, s.article_no, s.total.weight, s.total.time
                );
            }
        }
        Some("show") => {
            let rsn = parse_rsn(args.next())?;
            let overview = api
                .get_sample_overview(rsn)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        Some("new") => {
            let rsn = parse_rsn(args.next())?;
            let sample = api
                .create_sample(rsn, args.next())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("RSN={} ArticleNo={}", sample.rsn, sample.article_no_display());
        }
        Some(other) => bail!("未知命令: {} (可用: list / show <RSN> / new <RSN> [款号])", other),
    }

    Ok(())
}
