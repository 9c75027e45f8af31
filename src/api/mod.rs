// ==========================================
// 站点资源运营系统 - API 层
// ==========================================
// 职责: 提供运营分析 API,供命令行入口调用
// ==========================================

pub mod error;
pub mod export;
pub mod ops_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export::{ExportManifest, ReportExporter, TableCounts};
pub use ops_api::{DashboardRun, DashboardViews, OpsApi};
