// ==========================================
// 钢厂质检缺陷复发分析 - 文本呈现
// ==========================================
// 职责: 趋势列表表格、下钻明细、CSV 导出
// 约束: 仅做格式化，不改变分析结果
// ==========================================

use crate::domain::trend::{DefectDrillDown, DefectTrendSummary};
use crate::i18n::t_in;
use chrono::NaiveDateTime;
use std::fmt::Write as _;

const DATETIME_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_ts(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(DATETIME_DISPLAY).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// 单行字段（顺序与 DefectTrendSummary::FIELD_NAMES 一致）
fn summary_cells(s: &DefectTrendSummary) -> [String; 10] {
    [
        s.defect_code.clone(),
        s.severity.clone(),
        s.impacted_lot_count.to_string(),
        s.weeks_with_defects.to_string(),
        fmt_ts(s.first_detected),
        fmt_ts(s.last_detected),
        s.total_defects.to_string(),
        fmt_opt(s.days_span),
        s.trend_classification.label().to_string(),
        s.missing_periods.join(";"),
    ]
}

// ==========================================
// 趋势列表
// ==========================================

/// 渲染趋势列表（复发行以 `*` 标记；表头始终输出）
pub fn render_trend_table(summaries: &[DefectTrendSummary], locale: &str) -> String {
    let header: Vec<String> = DefectTrendSummary::FIELD_NAMES
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<[String; 10]> = summaries.iter().map(summary_cells).collect();

    // 列宽
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", t_in(locale, "report.trend_list_title", &[]));

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let _ = writeln!(out, "  {}", line(&header));
    for (summary, row) in summaries.iter().zip(&rows) {
        let marker = if summary.is_recurring() { '*' } else { ' ' };
        let _ = writeln!(out, "{} {}", marker, line(row));
    }

    if summaries.is_empty() {
        let _ = writeln!(out, "{}", t_in(locale, "report.empty_list", &[]));
    }
    out
}

// ==========================================
// 下钻
// ==========================================

pub fn render_drilldown(detail: &DefectDrillDown, locale: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        t_in(locale, "report.drilldown_title", &[("code", &detail.defect_code)])
    );
    let _ = writeln!(out, "{}", detail.message);

    if detail.has_gaps() {
        let weeks = detail.missing_weeks.join(", ");
        let _ = writeln!(
            out,
            "{}",
            t_in(locale, "report.missing_weeks", &[("weeks", &weeks)])
        );
    }

    for record in &detail.records {
        let _ = writeln!(
            out,
            "  {}  {:<20}  {:<10}  qty_defects={:<4} qty_checked={:<4} {}",
            fmt_ts(record.inspected_at),
            record.lot_id,
            record.severity.as_deref().unwrap_or("-"),
            record.qty_defects,
            record.qty_checked,
            record.disposition.as_deref().unwrap_or(""),
        );
    }
    out
}

// ==========================================
// CSV 导出
// ==========================================

/// 写出趋势列表 CSV（空列表同样写出表头）
pub fn write_trend_csv<W: std::io::Write>(
    writer: W,
    summaries: &[DefectTrendSummary],
) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(DefectTrendSummary::FIELD_NAMES)?;
    for summary in summaries {
        wtr.write_record(summary_cells(summary))?;
    }
    wtr.flush()?;
    Ok(())
}
