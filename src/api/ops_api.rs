// ==========================================
// 站点资源运营系统 - 运营分析 API
// ==========================================
// 职责: 封装 数据源 → 分析流水线 → 报表导出
// 架构: API 层 → Engine 层 (run_scoped_analysis) / Importer 层 (RecordSource)
// 红线: 全量作用域与筛选作用域相互独立,并发计算
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::export::{ExportManifest, ReportExporter};
use crate::config::{ConfigManager, PolicyConfig};
use crate::domain::kpi::{DailyTrendPoint, LossMixShare, SiteKpi};
use crate::domain::record::DailyRecord;
use crate::engine::pipeline::{run_scoped_analysis, AnalysisOutput, ScopeFilter};
use crate::engine::rollup;
use crate::importer::dq_validator::DqReport;
use crate::importer::record_source::{FileRecordSource, RecordSource};

/// 报表子目录名
pub const SCOPE_ALL: &str = "all";
pub const SCOPE_FILTERED: &str = "filtered";

/// 成本泄漏排行默认条数
pub const TOP_SITES: usize = 12;

// ==========================================
// DashboardRun - 一次分析运行的结果
// ==========================================
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub record_count: usize,
    pub dq_report: DqReport,
    pub scope: ScopeFilter,
    /// 全量数据
    pub all: AnalysisOutput,
    /// 筛选作用域 (作用域为全量时与 all 相同)
    pub filtered: AnalysisOutput,
}

// ==========================================
// DashboardViews - 下钻视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardViews {
    pub daily_trend: Vec<DailyTrendPoint>,
    pub loss_mix: Vec<LossMixShare>,
    pub top_sites: Vec<SiteKpi>,
}

impl DashboardViews {
    pub fn of(output: &AnalysisOutput, top_n: usize) -> Self {
        Self {
            daily_trend: rollup::daily_trend(&output.by_site_day),
            loss_mix: rollup::overall_loss_mix(&output.loss_mix_by_site),
            top_sites: rollup::top_sites_by_leakage(&output.by_site, top_n)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

// ==========================================
// OpsApi - 运营分析 API
// ==========================================
pub struct OpsApi {
    source: Arc<dyn RecordSource>,
    policy: PolicyConfig,
    exporter: ReportExporter,
}

impl OpsApi {
    /// 创建新的 OpsApi 实例
    ///
    /// # 参数
    /// - source: 记录数据源
    /// - policy: 分级策略 (创建时校验)
    /// - reports_dir: 报表输出目录
    pub fn new<P: Into<PathBuf>>(
        source: Arc<dyn RecordSource>,
        policy: PolicyConfig,
        reports_dir: P,
    ) -> ApiResult<Self> {
        policy.validate()?;
        Ok(Self {
            source,
            policy,
            exporter: ReportExporter::new(reports_dir),
        })
    }

    /// 按配置创建 (文件数据源;站点主数据存在时启用产能校验)
    pub fn from_config(config: &ConfigManager) -> ApiResult<Self> {
        let paths = config.paths();
        let mut source = FileRecordSource::new(&paths.daily_data_path);
        if paths.site_master_path.exists() {
            source = source.with_site_master(&paths.site_master_path);
        }
        Self::new(Arc::new(source), *config.policy(), &paths.reports_dir)
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// 对给定记录集执行一次作用域分析 (阻塞线程池)
    pub async fn analyze(
        &self,
        records: Arc<Vec<DailyRecord>>,
        scope: ScopeFilter,
    ) -> ApiResult<AnalysisOutput> {
        let policy = self.policy;
        tokio::task::spawn_blocking(move || run_scoped_analysis(&records, &scope, &policy))
            .await
            .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))?
            .map_err(ApiError::from)
    }

    /// 加载数据并计算 全量 + 筛选 两个作用域
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn run(&self, scope: &ScopeFilter) -> ApiResult<DashboardRun> {
        let loaded = self.source.load().await?;
        let record_count = loaded.records.len();
        let records = Arc::new(loaded.records);

        let (all, filtered) = if scope.is_all() {
            let all = self.analyze(records, ScopeFilter::all()).await?;
            (all.clone(), all)
        } else {
            futures::future::try_join(
                self.analyze(Arc::clone(&records), ScopeFilter::all()),
                self.analyze(records, scope.clone()),
            )
            .await?
        };

        info!(
            records = record_count,
            all_sites = all.by_site.len(),
            filtered_sites = filtered.by_site.len(),
            "运营分析完成"
        );

        Ok(DashboardRun {
            record_count,
            dq_report: loaded.dq_report,
            scope: scope.clone(),
            all,
            filtered,
        })
    }

    /// 导出两个作用域的报表
    pub fn export(&self, run: &DashboardRun) -> ApiResult<Vec<ExportManifest>> {
        Ok(vec![
            self.exporter.export(SCOPE_ALL, &run.all, &self.policy)?,
            self.exporter
                .export(SCOPE_FILTERED, &run.filtered, &self.policy)?,
        ])
    }

    pub fn reports_dir(&self) -> &std::path::Path {
        self.exporter.reports_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{LossReason, RiskStatus};
    use crate::importer::error::{ImportError, ImportResult};
    use crate::importer::record_source::LoadedRecords;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    struct StaticSource(Vec<DailyRecord>);

    #[async_trait]
    impl RecordSource for StaticSource {
        async fn load(&self) -> ImportResult<LoadedRecords> {
            Ok(LoadedRecords {
                records: self.0.clone(),
                dq_report: DqReport::default(),
            })
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RecordSource for FailingSource {
        async fn load(&self) -> ImportResult<LoadedRecords> {
            Err(ImportError::FileNotFound("missing.csv".to_string()))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn create_test_record(site_id: &str, day: u32, actual: u64, disposed: u64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            site_id: site_id.to_string(),
            planned_units: 1000,
            actual_units: actual,
            usable_units: actual - disposed,
            disposed_units: disposed,
            unit_cost: 5.0,
            loss_reason: LossReason::Spoilage,
            staffing_shortfall_flag: false,
            supplier_delay_flag: false,
            temp_excursion_flag: false,
        }
    }

    fn create_test_api(records: Vec<DailyRecord>, dir: &TempDir) -> OpsApi {
        OpsApi::new(
            Arc::new(StaticSource(records)),
            PolicyConfig::default(),
            dir.path(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_all_and_filtered_scopes() {
        let dir = TempDir::new().unwrap();
        let api = create_test_api(
            vec![
                create_test_record("S001", 1, 950, 40),
                create_test_record("S001", 2, 1000, 120),
                create_test_record("S002", 1, 1000, 10),
            ],
            &dir,
        );
        let scope = ScopeFilter {
            sites: Some(["S001".to_string()].into_iter().collect()),
            ..ScopeFilter::default()
        };

        let run = api.run(&scope).await.unwrap();
        assert_eq!(run.record_count, 3);
        assert_eq!(run.all.by_site.len(), 2);
        assert_eq!(run.filtered.by_site.len(), 1);
        assert_eq!(run.filtered.site_status[0].status, RiskStatus::Watch);
    }

    #[tokio::test]
    async fn test_run_all_scope_reuses_output() {
        let dir = TempDir::new().unwrap();
        let api = create_test_api(vec![create_test_record("S001", 1, 950, 40)], &dir);

        let run = api.run(&ScopeFilter::all()).await.unwrap();
        assert_eq!(run.all, run.filtered);
    }

    #[tokio::test]
    async fn test_run_and_export() {
        let dir = TempDir::new().unwrap();
        let api = create_test_api(vec![create_test_record("S001", 1, 950, 40)], &dir);

        let run = api.run(&ScopeFilter::all()).await.unwrap();
        let manifests = api.export(&run).unwrap();
        assert_eq!(manifests.len(), 2);
        assert!(dir.path().join(SCOPE_ALL).join("by_site.csv").exists());
        assert!(dir.path().join(SCOPE_FILTERED).join("manifest.json").exists());
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let api = OpsApi::new(Arc::new(FailingSource), PolicyConfig::default(), dir.path()).unwrap();
        let err = api.run(&ScopeFilter::all()).await.unwrap_err();
        assert!(matches!(err, ApiError::Import(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let dir = TempDir::new().unwrap();
        let policy = PolicyConfig {
            watch_loss_rate: 0.2,
            intervention_loss_rate: 0.1,
            ..PolicyConfig::default()
        };
        let result = OpsApi::new(Arc::new(StaticSource(vec![])), policy, dir.path());
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_dashboard_views() {
        let records = vec![
            create_test_record("S001", 1, 950, 40),
            create_test_record("S002", 1, 1000, 120),
        ];
        let output = crate::engine::pipeline::run_analysis(&records, &PolicyConfig::default()).unwrap();
        let views = DashboardViews::of(&output, 1);

        assert_eq!(views.daily_trend.len(), 1);
        assert_eq!(views.top_sites.len(), 1);
        assert_eq!(views.top_sites[0].site_id, "S002");
        assert_eq!(views.loss_mix[0].loss_reason, LossReason::Spoilage);
    }
}
