// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use steelworks_defect::domain::inspection::{InspectionEvent, RawEventFrame};

/// 构造时间戳（测试用，非法日期直接 panic）
pub fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

// ==========================================
// InspectionEvent 构建器
// ==========================================

pub struct EventBuilder {
    event: InspectionEvent,
}

impl EventBuilder {
    /// 有缺陷事件（默认 qty_defects = 1）
    pub fn defect(code: &str, severity: &str, lot_id: &str) -> Self {
        Self {
            event: InspectionEvent {
                defect_code: Some(code.to_string()),
                severity: Some(severity.to_string()),
                lot_id: lot_id.to_string(),
                inspected_at: None,
                qty_checked: 20,
                qty_defects: 1,
                disposition: None,
                notes: None,
                inspector_name: None,
            },
        }
    }

    /// 无缺陷检验记录
    pub fn clean(lot_id: &str) -> Self {
        let mut builder = Self::defect("", "", lot_id);
        builder.event.defect_code = None;
        builder.event.severity = None;
        builder.event.qty_defects = 0;
        builder
    }

    pub fn at(mut self, inspected_at: NaiveDateTime) -> Self {
        self.event.inspected_at = Some(inspected_at);
        self
    }

    pub fn on(self, y: i32, m: u32, d: u32) -> Self {
        self.at(ts(y, m, d, 8))
    }

    pub fn qty(mut self, qty_defects: u32) -> Self {
        self.event.qty_defects = qty_defects;
        self
    }

    pub fn no_severity(mut self) -> Self {
        self.event.severity = None;
        self
    }

    pub fn inspector(mut self, name: &str) -> Self {
        self.event.inspector_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> InspectionEvent {
        self.event
    }
}

// ==========================================
// 标准场景数据
// ==========================================

/// WELD/Critical 跨周复发、BURR 孤立、CRACK 同周多批次、POR 零缺陷
pub fn reference_events() -> Vec<InspectionEvent> {
    vec![
        EventBuilder::defect("WELD", "Critical", "LOT-1").on(2026, 1, 1).qty(2).build(),
        EventBuilder::defect("WELD", "Critical", "LOT-2").on(2026, 1, 15).qty(1).build(),
        EventBuilder::defect("BURR", "Major", "LOT-3").on(2026, 1, 8).build(),
        EventBuilder::defect("CRACK", "Major", "LOT-4").on(2026, 1, 8).qty(2).build(),
        EventBuilder::defect("CRACK", "Major", "LOT-5").on(2026, 1, 9).qty(4).build(),
        EventBuilder::defect("POR", "Minor", "LOT-6").on(2026, 1, 12).qty(0).build(),
        EventBuilder::clean("LOT-6").on(2026, 1, 14).build(),
    ]
}

// ==========================================
// RawEventFrame 构建器
// ==========================================

pub const STANDARD_COLUMNS: [&str; 5] =
    ["defect_code", "severity", "lot_id", "inspected_at", "qty_defects"];

/// 按标准列构造原始集合
pub fn raw_frame(rows: &[[&str; 5]]) -> RawEventFrame {
    let mut frame = RawEventFrame::new(STANDARD_COLUMNS.iter().map(|c| c.to_string()).collect());
    for row in rows {
        frame.push_row(STANDARD_COLUMNS.iter().copied().zip(row.iter().copied()));
    }
    frame
}

/// 确定性置换（不依赖随机数）：按步长跳跃取下标
pub fn permute<T: Clone>(items: &[T], step: usize) -> Vec<T> {
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }
    // 步长与 n 互素时为完全置换
    let mut step = step % n;
    while step == 0 || gcd(step, n) != 1 {
        step += 1;
    }
    (0..n).map(|i| items[(i * step + 1) % n].clone()).collect()
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
