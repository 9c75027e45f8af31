// ==========================================
// 站点资源运营系统 - 展示层汇总
// ==========================================
// 职责: 基于聚合表生成趋势 / 全局原因构成 / 成本泄漏排行
// 红线: 只读聚合表,不回读原始记录
// ==========================================

use crate::domain::kpi::{DailyTrendPoint, LossMixRow, LossMixShare, SiteDayKpi, SiteKpi};
use crate::domain::record::ratio;
use crate::domain::types::LossReason;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// 按日趋势 (日期升序)
///
/// cost_leakage 为当日各站点合计,loss_rate 为当日站点日损耗率简单平均
pub fn daily_trend(by_site_day: &[SiteDayKpi]) -> Vec<DailyTrendPoint> {
    let mut groups: BTreeMap<NaiveDate, (f64, f64, usize)> = BTreeMap::new();
    for day in by_site_day {
        let entry = groups.entry(day.date).or_insert((0.0, 0.0, 0));
        entry.0 += day.cost_leakage;
        entry.1 += day.loss_rate;
        entry.2 += 1;
    }

    groups
        .into_iter()
        .map(|(date, (cost_leakage, loss_rate_sum, n))| DailyTrendPoint {
            date,
            cost_leakage,
            loss_rate: loss_rate_sum / n as f64,
        })
        .collect()
}

/// 全局损耗原因构成 (报废量降序,并列按原因顺序)
pub fn overall_loss_mix(loss_mix_by_site: &[LossMixRow]) -> Vec<LossMixShare> {
    let mut by_reason: BTreeMap<LossReason, u64> = BTreeMap::new();
    for row in loss_mix_by_site {
        *by_reason.entry(row.loss_reason).or_insert(0) += row.disposed_units;
    }
    let total: u64 = by_reason.values().sum();

    let mut shares: Vec<LossMixShare> = by_reason
        .into_iter()
        .map(|(loss_reason, disposed_units)| LossMixShare {
            loss_reason,
            disposed_units,
            disposed_share: ratio(disposed_units, total),
        })
        .collect();
    shares.sort_by(|a, b| {
        b.disposed_units
            .cmp(&a.disposed_units)
            .then_with(|| a.loss_reason.cmp(&b.loss_reason))
    });
    shares
}

/// 成本泄漏排行前 N 的站点
pub fn top_sites_by_leakage(by_site: &[SiteKpi], n: usize) -> Vec<&SiteKpi> {
    let mut sites: Vec<&SiteKpi> = by_site.iter().collect();
    sites.sort_by(|a, b| {
        b.cost_leakage
            .total_cmp(&a.cost_leakage)
            .then_with(|| a.site_id.cmp(&b.site_id))
    });
    sites.truncate(n);
    sites
}
