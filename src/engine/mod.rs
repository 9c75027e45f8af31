// ==========================================
// 站点资源运营系统 - 引擎层
// ==========================================
// 职责: KPI 聚合 → 异常检测 → 风险分级 → 处置建议
// 红线: 纯计算,无 I/O;阈值只通过 PolicyConfig 传入
// ==========================================

pub mod action;
pub mod aggregator;
pub mod anomaly;
pub mod classifier;
pub mod error;
pub mod pipeline;
pub mod rollup;

// 重导出核心引擎
pub use aggregator::KpiAggregator;
pub use classifier::{Classification, DominantLoss, SiteClassifier};
pub use error::{EngineError, EngineResult};
pub use pipeline::{run_analysis, run_scoped_analysis, AnalysisOutput, ScopeFilter};
