// ==========================================
// 钢厂质检缺陷复发分析 - 数据库初始化工具
// ==========================================
// 用法: init_db [db_path] [--reset] [--no-seed] [--import FILE]...
// - --reset: 备份并删除已有数据库
// - --no-seed: 仅建表，不写入演示数据
// - --import: 导入 CSV/Excel 质检事件（可重复）
// ==========================================

use anyhow::{bail, Context};
use chrono::Local;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use steelworks_defect::config::get_default_db_path;
use steelworks_defect::db::{init_schema, open_sqlite_connection, seed_demo_data};
use steelworks_defect::importer::{InspectionImporter, InspectionImporterImpl};
use steelworks_defect::logging;
use steelworks_defect::repository::InspectionEventRepository;

#[derive(Debug, Default)]
struct InitArgs {
    db_path: Option<String>,
    reset: bool,
    seed: bool,
    imports: Vec<String>,
}

fn parse_args() -> anyhow::Result<InitArgs> {
    let mut args = InitArgs {
        seed: true,
        ..InitArgs::default()
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--reset" => args.reset = true,
            "--no-seed" => args.seed = false,
            "--import" => {
                let file = iter.next().context("--import 需要文件路径")?;
                args.imports.push(file);
            }
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            other => args.db_path = Some(other.to_string()),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args = parse_args()?;
    let db_path = args.db_path.clone().unwrap_or_else(get_default_db_path);

    if args.reset {
        backup_and_reset_db(&db_path)?;
    }

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn)?;
    // 已有质检数据时不重复写入演示数据
    let existing: i64 =
        conn.query_row("SELECT COUNT(*) FROM inspection_event", [], |row| row.get(0))?;
    if args.seed && existing == 0 {
        seed_demo_data(&conn)?;
    }

    let repo = Arc::new(InspectionEventRepository::from_connection(Arc::new(
        Mutex::new(conn),
    )));

    if !args.imports.is_empty() {
        let importer = InspectionImporterImpl::new(Arc::clone(&repo));
        let results = importer.batch_import(args.imports.clone()).await;
        for (file, result) in args.imports.iter().zip(results) {
            match result {
                Ok(summary) => eprintln!(
                    "Imported {}: {} rows ({} qualifying), batch {}",
                    summary.file_name, summary.imported_rows, summary.qualifying_rows, summary.batch_id
                ),
                Err(e) => eprintln!("Import failed for {}: {}", file, e),
            }
        }
    }

    let count = repo.count_events()?;
    eprintln!("Database ready: {} ({} inspection events)", db_path, count);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> anyhow::Result<()> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}
