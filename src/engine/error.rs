// ==========================================
// 钢厂质检缺陷复发分析 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 仅结构性缺列报错，行级脏数据一律强制转换
// ==========================================

use thiserror::Error;

/// 结构校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("输入缺少必需字段: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },
}

impl ValidationError {
    /// 缺失的字段名列表
    pub fn missing_columns(&self) -> &[String] {
        match self {
            ValidationError::MissingColumns { columns } => columns,
        }
    }
}

/// Result 类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;
