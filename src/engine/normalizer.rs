// ==========================================
// 钢厂质检缺陷复发分析 - 事件归一化器
// ==========================================
// 职责: 原始集合 → 规范事件
// 1) 结构校验: 必需列整列缺失时报错（一次列出全部缺失列）
// 2) 字段映射: 支持列名别名
// 3) 清洗: TRIM / NULL 标准化 / 数值与时间强制转换
// 红线: 行级脏数据只做转换，不拒绝
// ==========================================

use crate::domain::inspection::{InspectionEvent, RawEventFrame};
use crate::engine::error::{ValidationError, ValidationResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

// ==========================================
// 字段定义
// ==========================================

/// 标准字段及其可接受的源列名
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub const DEFECT_CODE: FieldDef = FieldDef {
    name: "defect_code",
    aliases: &["defect_code", "defect_id"],
};
pub const SEVERITY: FieldDef = FieldDef {
    name: "severity",
    aliases: &["severity"],
};
pub const LOT_ID: FieldDef = FieldDef {
    name: "lot_id",
    aliases: &["lot_id", "normalized_lot_id"],
};
pub const INSPECTED_AT: FieldDef = FieldDef {
    name: "inspected_at",
    aliases: &["inspected_at", "inspection_timestamp"],
};
pub const QTY_DEFECTS: FieldDef = FieldDef {
    name: "qty_defects",
    aliases: &["qty_defects"],
};
pub const QTY_CHECKED: FieldDef = FieldDef {
    name: "qty_checked",
    aliases: &["qty_checked"],
};
pub const DISPOSITION: FieldDef = FieldDef {
    name: "disposition",
    aliases: &["disposition"],
};
pub const NOTES: FieldDef = FieldDef {
    name: "notes",
    aliases: &["notes"],
};
pub const INSPECTOR_NAME: FieldDef = FieldDef {
    name: "inspector_name",
    aliases: &["inspector_name"],
};

/// 结构性必需字段（校验顺序即报错顺序）
pub const REQUIRED_FIELDS: [FieldDef; 5] = [DEFECT_CODE, SEVERITY, LOT_ID, INSPECTED_AT, QTY_DEFECTS];

/// 可接受的时间格式（按顺序尝试）
const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y%m%d %H:%M:%S",
];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

// ==========================================
// 归一化统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub total_rows: usize,
    pub unparseable_timestamps: usize,
    pub coerced_quantities: usize,
}

// ==========================================
// EventNormalizer - 事件归一化器
// ==========================================
// 无状态，所有方法都是纯函数
#[derive(Debug, Clone, Copy, Default)]
pub struct EventNormalizer;

impl EventNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 校验结构：返回缺失的必需字段
    pub fn validate_schema(&self, frame: &RawEventFrame) -> ValidationResult<()> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| resolve_column(frame, field).is_none())
            .map(|field| field.name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingColumns { columns: missing })
        }
    }

    /// 归一化整个集合
    pub fn normalize(&self, frame: &RawEventFrame) -> ValidationResult<Vec<InspectionEvent>> {
        self.normalize_with_stats(frame).map(|(events, _)| events)
    }

    /// 归一化整个集合，并返回强制转换统计
    pub fn normalize_with_stats(
        &self,
        frame: &RawEventFrame,
    ) -> ValidationResult<(Vec<InspectionEvent>, NormalizeStats)> {
        self.validate_schema(frame)?;

        let mapping = ColumnMapping::resolve(frame);
        let mut stats = NormalizeStats {
            total_rows: frame.rows.len(),
            ..NormalizeStats::default()
        };

        let events: Vec<InspectionEvent> = frame
            .rows
            .iter()
            .map(|row| self.normalize_row(row, &mapping, &mut stats))
            .collect();

        tracing::debug!(
            total_rows = stats.total_rows,
            unparseable_timestamps = stats.unparseable_timestamps,
            coerced_quantities = stats.coerced_quantities,
            "inspection events normalized"
        );

        Ok((events, stats))
    }

    fn normalize_row(
        &self,
        row: &HashMap<String, String>,
        mapping: &ColumnMapping,
        stats: &mut NormalizeStats,
    ) -> InspectionEvent {
        let cell = |column: Option<&String>| column.and_then(|c| row.get(c)).map(String::as_str);

        let raw_ts = cell(mapping.inspected_at.as_ref());
        let inspected_at = raw_ts.and_then(parse_timestamp);
        if inspected_at.is_none() {
            stats.unparseable_timestamps += 1;
        }

        let raw_qty = cell(mapping.qty_defects.as_ref());
        let qty_defects = coerce_quantity(raw_qty);
        if qty_defects.is_none() {
            stats.coerced_quantities += 1;
        }

        InspectionEvent {
            defect_code: clean_text(cell(mapping.defect_code.as_ref())),
            severity: clean_text(cell(mapping.severity.as_ref())),
            lot_id: clean_text(cell(mapping.lot_id.as_ref())).unwrap_or_default(),
            inspected_at,
            qty_checked: coerce_quantity(cell(mapping.qty_checked.as_ref())).unwrap_or(0),
            qty_defects: qty_defects.unwrap_or(0),
            disposition: clean_text(cell(mapping.disposition.as_ref())),
            notes: clean_text(cell(mapping.notes.as_ref())),
            inspector_name: clean_text(cell(mapping.inspector_name.as_ref())),
        }
    }
}

// ==========================================
// 列映射
// ==========================================
#[derive(Debug, Default)]
struct ColumnMapping {
    defect_code: Option<String>,
    severity: Option<String>,
    lot_id: Option<String>,
    inspected_at: Option<String>,
    qty_defects: Option<String>,
    qty_checked: Option<String>,
    disposition: Option<String>,
    notes: Option<String>,
    inspector_name: Option<String>,
}

impl ColumnMapping {
    fn resolve(frame: &RawEventFrame) -> Self {
        Self {
            defect_code: resolve_column(frame, &DEFECT_CODE),
            severity: resolve_column(frame, &SEVERITY),
            lot_id: resolve_column(frame, &LOT_ID),
            inspected_at: resolve_column(frame, &INSPECTED_AT),
            qty_defects: resolve_column(frame, &QTY_DEFECTS),
            qty_checked: resolve_column(frame, &QTY_CHECKED),
            disposition: resolve_column(frame, &DISPOSITION),
            notes: resolve_column(frame, &NOTES),
            inspector_name: resolve_column(frame, &INSPECTOR_NAME),
        }
    }
}

/// 按别名顺序找到第一个存在的源列
fn resolve_column(frame: &RawEventFrame, field: &FieldDef) -> Option<String> {
    field.aliases
        .iter()
        .find(|alias| frame.has_column(alias))
        .map(|alias| alias.to_string())
}

// ==========================================
// 清洗函数
// ==========================================

/// TRIM + 空串视为 NULL
pub fn clean_text(value: Option<&str>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 解析时间戳；无法解析返回 None
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(v, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// 数量转换为非负整数
///
/// - 整数或整值小数（如 "3.0"）原样接受
/// - 负数截为 0
/// - 无法解析返回 None（调用方按 0 处理）
pub fn coerce_quantity(value: Option<&str>) -> Option<u32> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }

    let parsed = match v.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f = v.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };

    Some(parsed.clamp(0, u32::MAX as i64) as u32)
}
