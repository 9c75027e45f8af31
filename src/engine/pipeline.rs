// ==========================================
// 站点资源运营系统 - 分析流水线
// ==========================================
// 职责: 作用域过滤 → Aggregator → Classifier
// 输入: DailyRecord 集合 + PolicyConfig
// 输出: AnalysisOutput (五张对外表 + 异常日明细)
// 红线: 单次调用无副作用,多个作用域可并发独立计算
// ==========================================

use crate::config::PolicyConfig;
use crate::domain::kpi::{KpiTables, LossMixRow, OverallKpi, SiteDayKpi, SiteKpi};
use crate::domain::record::DailyRecord;
use crate::domain::status::{SiteDayAnomaly, SiteStatus};
use crate::engine::aggregator::KpiAggregator;
use crate::engine::classifier::SiteClassifier;
use crate::engine::error::EngineResult;
use crate::perf::PerfGuard;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// ScopeFilter - 作用域过滤 (站点 + 日期区间)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeFilter {
    /// None 表示全部站点
    pub sites: Option<BTreeSet<String>>,
    /// 起始日期 (含)
    pub start: Option<NaiveDate>,
    /// 截止日期 (含)
    pub end: Option<NaiveDate>,
}

impl ScopeFilter {
    /// 全量作用域
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_all(&self) -> bool {
        self.sites.is_none() && self.start.is_none() && self.end.is_none()
    }

    pub fn matches(&self, record: &DailyRecord) -> bool {
        if let Some(sites) = &self.sites {
            if !sites.contains(&record.site_id) {
                return false;
            }
        }
        if let Some(start) = self.start {
            if record.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if record.date > end {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: &[DailyRecord]) -> Vec<DailyRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

// ==========================================
// AnalysisOutput - 对外输出表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub overall: OverallKpi,
    pub by_site: Vec<SiteKpi>,
    pub by_site_day: Vec<SiteDayKpi>,
    pub loss_mix_by_site: Vec<LossMixRow>,
    pub site_status: Vec<SiteStatus>,
    pub anomalies: Vec<SiteDayAnomaly>,
}

impl AnalysisOutput {
    pub fn kpis(&self) -> KpiTables {
        KpiTables {
            overall: self.overall.clone(),
            by_site: self.by_site.clone(),
            by_site_day: self.by_site_day.clone(),
            loss_mix_by_site: self.loss_mix_by_site.clone(),
        }
    }
}

/// 执行一次完整分析 (Aggregator → Classifier)
pub fn run_analysis(records: &[DailyRecord], policy: &PolicyConfig) -> EngineResult<AnalysisOutput> {
    let _perf = PerfGuard::new("engine.run_analysis");

    let kpis = KpiAggregator::new().compute(records)?;
    let classification = SiteClassifier::new().classify_detailed(
        &kpis.by_site,
        &kpis.by_site_day,
        &kpis.loss_mix_by_site,
        policy,
    )?;

    tracing::info!(
        records = records.len(),
        sites = kpis.by_site.len(),
        anomalies = classification.anomalies.len(),
        "分析完成"
    );

    Ok(AnalysisOutput {
        overall: kpis.overall,
        by_site: kpis.by_site,
        by_site_day: kpis.by_site_day,
        loss_mix_by_site: kpis.loss_mix_by_site,
        site_status: classification.site_status,
        anomalies: classification.anomalies,
    })
}

/// 过滤后执行分析
pub fn run_scoped_analysis(
    records: &[DailyRecord],
    scope: &ScopeFilter,
    policy: &PolicyConfig,
) -> EngineResult<AnalysisOutput> {
    if scope.is_all() {
        return run_analysis(records, policy);
    }
    let scoped = scope.apply(records);
    tracing::debug!(before = records.len(), after = scoped.len(), "作用域过滤完成");
    run_analysis(&scoped, policy)
}
