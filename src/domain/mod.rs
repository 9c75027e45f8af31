// ==========================================
// 站点资源运营系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、输出表结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod kpi;
pub mod record;
pub mod status;
pub mod types;

// 重导出核心类型
pub use kpi::{
    DailyTrendPoint, KpiTables, LossMixRow, LossMixShare, OverallKpi, SiteDayKpi, SiteKpi,
};
pub use record::DailyRecord;
pub use status::{SiteDayAnomaly, SiteStatus};
pub use types::{LossReason, RiskStatus};
