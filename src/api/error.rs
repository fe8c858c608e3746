// ==========================================
// 钢厂质检缺陷复发分析 - API层错误类型
// ==========================================
// 职责: 将仓储/校验错误转换为用户可读的错误消息
// 要求: 所有错误信息必须包含显式原因（可解释性）
// ==========================================

use crate::engine::error::ValidationError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据源读取失败: {0}")]
    SourceError(String),

    // ==========================================
    // 数据结构错误
    // ==========================================
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg)
            | RepositoryError::CheckConstraintViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::SourceReadError {
                source_name,
                message,
            } => ApiError::SourceError(format!("{}: {}", source_name, message)),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ValidationError 转换
// ==========================================
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Validation(e) => e.into(),
            ImportError::Repository(e) => e.into(),
            ImportError::FileNotFound(path) => ApiError::NotFound(path),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_columns() {
        let err: ApiError = ValidationError::MissingColumns {
            columns: vec!["severity".to_string(), "qty_defects".to_string()],
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("severity"));
        assert!(msg.contains("qty_defects"));
    }

    #[test]
    fn test_source_read_error_mapping() {
        let err: ApiError = RepositoryError::SourceReadError {
            source_name: "events.csv".to_string(),
            message: "文件不存在".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::SourceError(ref m) if m.starts_with("events.csv")));
    }
}
