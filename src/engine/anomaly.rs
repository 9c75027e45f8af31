// ==========================================
// 站点资源运营系统 - 损耗率异常检测
// ==========================================
// 职责: 站点内逐日损耗率 z-score,标记 |z| >= 阈值 的异常日
// 输入: BySiteDay + z 阈值
// 输出: SiteDayAnomaly 列表
// 红线: 仅为诊断信息,不参与风险分级
// ==========================================

use crate::domain::kpi::SiteDayKpi;
use crate::domain::status::SiteDayAnomaly;
use std::collections::BTreeMap;

/// 样本均值与样本标准差 (n - 1)
///
/// 少于 2 个样本时标准差视为 0
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

/// 检测异常日 (按 site_id, date 升序)
///
/// 标准差为 0 的站点 (损耗率恒定) 不产生异常日
pub fn detect_anomalies(by_site_day: &[SiteDayKpi], zscore_threshold: f64) -> Vec<SiteDayAnomaly> {
    let mut per_site: BTreeMap<&str, Vec<&SiteDayKpi>> = BTreeMap::new();
    for day in by_site_day {
        per_site.entry(day.site_id.as_str()).or_default().push(day);
    }

    let mut anomalies = Vec::new();
    for (site_id, mut days) in per_site {
        days.sort_by_key(|d| d.date);

        let rates: Vec<f64> = days.iter().map(|d| d.loss_rate).collect();
        let (mean, stddev) = mean_and_stddev(&rates);
        if stddev <= f64::EPSILON {
            continue;
        }

        for day in days {
            let z_score = (day.loss_rate - mean) / stddev;
            if z_score.abs() >= zscore_threshold {
                anomalies.push(SiteDayAnomaly {
                    site_id: site_id.to_string(),
                    date: day.date,
                    loss_rate: day.loss_rate,
                    z_score,
                });
            }
        }
    }

    if !anomalies.is_empty() {
        tracing::debug!(count = anomalies.len(), zscore_threshold, "损耗率异常检测完成");
    }

    anomalies
}

/// 统计每个站点的异常日数
pub fn count_by_site(anomalies: &[SiteDayAnomaly]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for anomaly in anomalies {
        *counts.entry(anomaly.site_id.clone()).or_insert(0) += 1;
    }
    counts
}
