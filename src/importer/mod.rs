// ==========================================
// 站点资源运营系统 - 导入层
// ==========================================
// 职责: 外部数据导入,生成引擎输入 (DailyRecord)
// 支持: Excel, CSV
// 流程: 文件解析 → 字段映射 → DQ 校验
// ==========================================

// 模块声明
pub mod dq_validator;
pub mod error;
pub mod file_parser;
pub mod record_mapper;
pub mod record_source;
pub mod site_master;

// 重导出核心类型
pub use dq_validator::{DqLevel, DqReport, DqRule, DqSummary, DqValidator, DqViolation};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, RawTable, UniversalFileParser};
pub use record_mapper::{map_daily_records, validate_columns};
pub use record_source::{FileRecordSource, LoadedRecords, RecordSource};
pub use site_master::{SiteInfo, SiteMaster};
