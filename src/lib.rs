// ==========================================
// 站点资源运营系统 - 核心库
// ==========================================
// 职责: 站点日度资源数据 → KPI 聚合 → 站点风险分级
// 系统定位: 决策支持 (阈值可配置,结论可解释)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 聚合与分级
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 策略阈值与路径
pub mod config;

// 日志系统
pub mod logging;

// 性能计时
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    DailyRecord, KpiTables, LossMixRow, LossReason, OverallKpi, RiskStatus, SiteDayAnomaly,
    SiteDayKpi, SiteKpi, SiteStatus,
};

// 引擎
pub use engine::{
    run_analysis, run_scoped_analysis, AnalysisOutput, EngineError, KpiAggregator, ScopeFilter,
    SiteClassifier,
};

// 配置
pub use config::{ConfigManager, PolicyConfig};

// API
pub use api::{ApiError, OpsApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "站点资源运营系统";
