// ==========================================
// 站点资源运营系统 - KPI 聚合引擎
// ==========================================
// 职责: 原始记录 → 全局 / 站点 / 站点日 / 站点原因构成 四张表
// 输入: 已校验的 DailyRecord 集合 (可能已按站点/日期过滤)
// 输出: KpiTables
// 红线: 各粒度独立计算,无缓存;空输入返回全零行而非报错
// ==========================================

use crate::domain::kpi::{KpiTables, LossMixRow, OverallKpi, SiteDayKpi, SiteKpi};
use crate::domain::record::{ratio, DailyRecord};
use crate::domain::types::LossReason;
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;

// ==========================================
// KpiAccumulator - 单一作用域累加器
// ==========================================
// Overall 与 BySite 共用同一聚合形状
#[derive(Debug, Default)]
struct KpiAccumulator {
    planned_units: u64,
    actual_units: u64,
    usable_units: u64,
    disposed_units: u64,
    cost_leakage: f64,
    unit_cost_sum: f64,
    loss_rate_sum: f64,
    utilization_rate_sum: f64,
    shock_days: u64,
    record_count: u64,
}

impl KpiAccumulator {
    fn add(&mut self, record: &DailyRecord) {
        self.planned_units += record.planned_units;
        self.actual_units += record.actual_units;
        self.usable_units += record.usable_units;
        self.disposed_units += record.disposed_units;
        self.cost_leakage += record.cost_leakage();
        self.unit_cost_sum += record.unit_cost;
        self.loss_rate_sum += record.loss_rate();
        self.utilization_rate_sum += record.utilization_rate();
        if record.has_shock() {
            self.shock_days += 1;
        }
        self.record_count += 1;
    }

    fn mean(&self, sum: f64) -> f64 {
        if self.record_count == 0 {
            return 0.0;
        }
        sum / self.record_count as f64
    }

    fn into_overall(self) -> OverallKpi {
        OverallKpi {
            planned_units: self.planned_units,
            actual_units: self.actual_units,
            usable_units: self.usable_units,
            disposed_units: self.disposed_units,
            cost_leakage: self.cost_leakage,
            avg_unit_cost: self.mean(self.unit_cost_sum),
            avg_loss_rate: self.mean(self.loss_rate_sum),
            avg_utilization_rate: self.mean(self.utilization_rate_sum),
            shock_days: self.shock_days,
            record_count: self.record_count,
        }
    }

    fn into_site(self, site_id: String) -> SiteKpi {
        SiteKpi {
            site_id,
            planned_units: self.planned_units,
            actual_units: self.actual_units,
            usable_units: self.usable_units,
            disposed_units: self.disposed_units,
            cost_leakage: self.cost_leakage,
            avg_unit_cost: self.mean(self.unit_cost_sum),
            avg_loss_rate: self.mean(self.loss_rate_sum),
            avg_utilization_rate: self.mean(self.utilization_rate_sum),
            loss_rate_weighted: ratio(self.disposed_units, self.actual_units),
            shock_days: self.shock_days,
            record_count: self.record_count,
        }
    }
}

// ==========================================
// KpiAggregator - KPI 聚合引擎
// ==========================================
pub struct KpiAggregator {
    // 无状态引擎
}

impl KpiAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算全部四张聚合表
    ///
    /// # 错误
    /// 任一记录违反 usable + disposed == actual 时返回 EngineError::Integrity,
    /// 整批失败
    pub fn compute(&self, records: &[DailyRecord]) -> EngineResult<KpiTables> {
        self.assert_integrity(records)?;

        let tables = KpiTables {
            overall: self.overall(records),
            by_site: self.by_site(records),
            by_site_day: self.by_site_day(records),
            loss_mix_by_site: self.loss_mix_by_site(records),
        };

        tracing::debug!(
            records = records.len(),
            sites = tables.by_site.len(),
            site_days = tables.by_site_day.len(),
            loss_mix_rows = tables.loss_mix_by_site.len(),
            "KPI 聚合完成"
        );

        Ok(tables)
    }

    /// 结构不变量复核 (导入阶段已校验,此处再次断言)
    pub fn assert_integrity(&self, records: &[DailyRecord]) -> EngineResult<()> {
        match records.iter().find(|r| !r.is_balanced()) {
            Some(r) => Err(EngineError::Integrity {
                site_id: r.site_id.clone(),
                date: r.date,
                actual: r.actual_units,
                usable: r.usable_units,
                disposed: r.disposed_units,
            }),
            None => Ok(()),
        }
    }

    /// 全局汇总
    pub fn overall(&self, records: &[DailyRecord]) -> OverallKpi {
        let mut acc = KpiAccumulator::default();
        for record in records {
            acc.add(record);
        }
        acc.into_overall()
    }

    /// 站点汇总 (按 site_id 升序)
    pub fn by_site(&self, records: &[DailyRecord]) -> Vec<SiteKpi> {
        let mut groups: BTreeMap<&str, KpiAccumulator> = BTreeMap::new();
        for record in records {
            groups.entry(record.site_id.as_str()).or_default().add(record);
        }

        groups
            .into_iter()
            .map(|(site_id, acc)| acc.into_site(site_id.to_string()))
            .collect()
    }

    /// 站点日明细 (按 site_id, date 升序)
    pub fn by_site_day(&self, records: &[DailyRecord]) -> Vec<SiteDayKpi> {
        let mut groups: BTreeMap<(&str, NaiveDate), Vec<&DailyRecord>> = BTreeMap::new();
        for record in records {
            groups
                .entry((record.site_id.as_str(), record.date))
                .or_default()
                .push(record);
        }

        groups
            .into_iter()
            .map(|((site_id, date), rows)| {
                let planned_units: u64 = rows.iter().map(|r| r.planned_units).sum();
                let actual_units: u64 = rows.iter().map(|r| r.actual_units).sum();
                let usable_units: u64 = rows.iter().map(|r| r.usable_units).sum();
                let disposed_units: u64 = rows.iter().map(|r| r.disposed_units).sum();
                let cost_leakage: f64 = rows.iter().map(|r| r.cost_leakage()).sum();
                let unit_cost =
                    rows.iter().map(|r| r.unit_cost).sum::<f64>() / rows.len() as f64;

                SiteDayKpi {
                    site_id: site_id.to_string(),
                    date,
                    planned_units,
                    actual_units,
                    usable_units,
                    disposed_units,
                    unit_cost,
                    cost_leakage,
                    loss_rate: ratio(disposed_units, actual_units),
                    utilization_rate: ratio(actual_units, planned_units),
                    shock_flag: rows.iter().any(|r| r.has_shock()),
                    record_count: rows.len() as u64,
                }
            })
            .collect()
    }

    /// 站点损耗原因构成 (按 site_id, 原因顺序 升序)
    pub fn loss_mix_by_site(&self, records: &[DailyRecord]) -> Vec<LossMixRow> {
        let mut groups: BTreeMap<(&str, LossReason), u64> = BTreeMap::new();
        for record in records {
            *groups
                .entry((record.site_id.as_str(), record.loss_reason))
                .or_insert(0) += record.disposed_units;
        }

        groups
            .into_iter()
            .map(|((site_id, loss_reason), disposed_units)| LossMixRow {
                site_id: site_id.to_string(),
                loss_reason,
                disposed_units,
            })
            .collect()
    }
}

impl Default for KpiAggregator {
    fn default() -> Self {
        Self::new()
    }
}
