// ==========================================
// 钢厂质检缺陷复发分析 - 命令行入口
// ==========================================
// 用法:
//   steelworks-defect [--db PATH | --file PATH] [--all | --recurring-only]
//                     [--defect CODE] [--json | --csv]
// 默认: 读取数据库，列表过滤开关取自配置
// ==========================================

use anyhow::{bail, Context};
use std::io::Write;

use steelworks_defect::app::{AppState, DataSource};
use steelworks_defect::config::get_default_db_path;
use steelworks_defect::{logging, presentation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug)]
struct CliArgs {
    source: DataSource,
    recurring_only: Option<bool>,
    defect: Option<String>,
    format: OutputFormat,
}

const USAGE: &str = "usage: steelworks-defect [--db PATH | --file PATH] [--all | --recurring-only] [--defect CODE] [--json | --csv]";

fn parse_args() -> anyhow::Result<Option<CliArgs>> {
    let mut db: Option<String> = None;
    let mut file: Option<String> = None;
    let mut recurring_only = None;
    let mut defect = None;
    let mut format = OutputFormat::Table;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => db = Some(iter.next().context("--db 需要数据库路径")?),
            "--file" => file = Some(iter.next().context("--file 需要文件路径")?),
            "--all" => recurring_only = Some(false),
            "--recurring-only" => recurring_only = Some(true),
            "--defect" => defect = Some(iter.next().context("--defect 需要缺陷代码")?),
            "--json" => format = OutputFormat::Json,
            "--csv" => format = OutputFormat::Csv,
            "-h" | "--help" => return Ok(None),
            other => bail!("未知参数: {}\n{}", other, USAGE),
        }
    }

    let source = match (db, file) {
        (Some(_), Some(_)) => bail!("--db 与 --file 不能同时使用"),
        (_, Some(file)) => DataSource::File(file.into()),
        (Some(db), None) => DataSource::Database(db),
        (None, None) => DataSource::Database(get_default_db_path()),
    };

    Ok(Some(CliArgs {
        source,
        recurring_only,
        defect,
        format,
    }))
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let Some(args) = parse_args()? else {
        println!("{}", USAGE);
        return Ok(());
    };

    tracing::info!(version = steelworks_defect::VERSION, "{}", steelworks_defect::APP_NAME);

    let state = AppState::new(args.source, |key| std::env::var(key).ok())
        .map_err(anyhow::Error::msg)?;
    let locale = state.config.locale.clone();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(code) = args.defect {
        let detail = state.defect_api.get_defect_drilldown(&code)?;
        match args.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&detail)?)?,
            _ => write!(out, "{}", presentation::render_drilldown(&detail, &locale))?,
        }
        return Ok(());
    }

    let recurring_only = args
        .recurring_only
        .unwrap_or(state.config.show_recurring_only);
    let summaries = state.defect_api.get_defect_trend_list(recurring_only)?;

    match args.format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&summaries)?)?,
        OutputFormat::Csv => presentation::write_trend_csv(&mut out, &summaries)?,
        OutputFormat::Table => {
            write!(out, "{}", presentation::render_trend_table(&summaries, &locale))?
        }
    }
    Ok(())
}
