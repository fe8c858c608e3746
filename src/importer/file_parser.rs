// ==========================================
// 钢厂质检缺陷复发分析 - 文件解析器
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: RawEventFrame（表头 + 字符串单元格）
// ==========================================

use crate::domain::inspection::RawEventFrame;
use crate::engine::gateway::InspectionEventGateway;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::inspection_event_repo::TIMESTAMP_FORMAT;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// 文件解析接口
pub trait FileParser {
    fn parse_to_frame(&self, file_path: &Path) -> ImportResult<RawEventFrame>;
}

/// 文件存在性与扩展名检查
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

/// 按表头组装一行；完全空白的行返回 None
fn build_row<I>(headers: &[String], values: I) -> Option<HashMap<String, String>>
where
    I: IntoIterator<Item = String>,
{
    let row: HashMap<String, String> = headers
        .iter()
        .cloned()
        .zip(values.into_iter().map(|v| v.trim().to_string()))
        .collect();

    if row.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_frame(&self, file_path: &Path) -> ImportResult<RawEventFrame> {
        check_file(file_path, &["csv"])?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头（去除 UTF-8 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut frame = RawEventFrame::new(headers.clone());
        for result in reader.records() {
            let record = result?;
            if let Some(row) = build_row(&headers, record.iter().map(str::to_string)) {
                frame.rows.push(row);
            }
        }

        Ok(frame)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

/// Excel 单元格 → 文本
///
/// 日期单元格按 TIMESTAMP_FORMAT 输出（默认 Display 只给出序列号）
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
            None => dt.to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

impl FileParser for ExcelParser {
    fn parse_to_frame(&self, file_path: &Path) -> ImportResult<RawEventFrame> {
        check_file(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect();

        let mut frame = RawEventFrame::new(headers.clone());
        for data_row in rows {
            if let Some(row) = build_row(&headers, data_row.iter().map(cell_to_string)) {
                frame.rows.push(row);
            }
        }

        Ok(frame)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawEventFrame> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_frame(path),
            "xlsx" | "xls" => ExcelParser.parse_to_frame(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

// ==========================================
// FileEventSource - 以文件为数据源的网关
// ==========================================
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl InspectionEventGateway for FileEventSource {
    fn fetch_inspection_events(&self) -> RepositoryResult<RawEventFrame> {
        UniversalFileParser
            .parse(&self.path)
            .map_err(|e| RepositoryError::SourceReadError {
                source_name: self.path.display().to_string(),
                message: e.to_string(),
            })
    }
}
