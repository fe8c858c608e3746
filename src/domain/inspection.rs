// ==========================================
// 钢厂质检缺陷复发分析 - 质检事件领域模型
// ==========================================
// RawEventFrame: 数据网关交付的原始集合（异构字符串单元格）
// InspectionEvent: 归一化后的规范事件
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// RawEventFrame - 原始事件集合
// ==========================================
/// 列名有序保存；单元格为空字符串视为 NULL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEventFrame {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawEventFrame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 由 (列名, 值) 列表追加一行
    pub fn push_row<K, V>(&mut self, cells: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let row = cells
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.rows.push(row);
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// InspectionEvent - 质检事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionEvent {
    // 缺陷信息（无缺陷时为空）
    pub defect_code: Option<String>,
    pub severity: Option<String>,

    // 批次与时间
    pub lot_id: String,
    /// None 表示时间戳无法解析
    pub inspected_at: Option<NaiveDateTime>,

    // 数量
    pub qty_checked: u32,
    pub qty_defects: u32,

    // 描述字段（不参与分类）
    pub disposition: Option<String>,
    pub notes: Option<String>,
    pub inspector_name: Option<String>,
}

impl InspectionEvent {
    /// 是否计入趋势统计: qty_defects > 0 且缺陷代码、严重度均存在
    pub fn is_qualifying(&self) -> bool {
        self.qty_defects > 0 && self.defect_code.is_some() && self.severity.is_some()
    }

    /// 是否为指定缺陷代码的有效事件
    pub fn qualifies_for(&self, defect_code: &str) -> bool {
        self.is_qualifying() && self.defect_code.as_deref() == Some(defect_code)
    }
}
