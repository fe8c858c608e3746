// ==========================================
// 钢厂质检缺陷复发分析 - 导入层
// ==========================================
// 职责: 外部质检数据导入
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod inspection_importer_impl;
pub mod inspection_importer_trait;

pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileEventSource, FileParser, UniversalFileParser};
pub use inspection_importer_impl::InspectionImporterImpl;
pub use inspection_importer_trait::{ImportBatchSummary, InspectionImporter};
