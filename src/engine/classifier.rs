// ==========================================
// 站点资源运营系统 - 站点风险分级引擎
// ==========================================
// 职责: 站点风险等级 + 主导损耗原因 + 建议动作
// 输入: BySite + BySiteDay + LossMixBySite + PolicyConfig
// 输出: SiteStatus (按风险从高到低排序)
// 红线: 纯函数,每次从当前作用域聚合结果完整重算,无历史状态
// ==========================================

use crate::config::PolicyConfig;
use crate::domain::kpi::{LossMixRow, SiteDayKpi, SiteKpi};
use crate::domain::record::ratio;
use crate::domain::status::{SiteDayAnomaly, SiteStatus};
use crate::domain::types::{LossReason, RiskStatus};
use crate::engine::action::recommended_action;
use crate::engine::anomaly::{count_by_site, detect_anomalies};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{BTreeMap, BTreeSet};

const TABLE_BY_SITE: &str = "by_site";
const TABLE_BY_SITE_DAY: &str = "by_site_day";
const TABLE_LOSS_MIX: &str = "loss_mix_by_site";

/// 分级结果: 站点状态 + 异常日明细
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub site_status: Vec<SiteStatus>,
    pub anomalies: Vec<SiteDayAnomaly>,
}

/// 主导损耗原因
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantLoss {
    pub reason: LossReason,
    pub share: f64,
}

// ==========================================
// SiteClassifier - 站点风险分级引擎
// ==========================================
pub struct SiteClassifier {
    // 无状态引擎,策略在调用时传入
}

impl SiteClassifier {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成站点风险状态表
    pub fn classify(
        &self,
        by_site: &[SiteKpi],
        by_site_day: &[SiteDayKpi],
        loss_mix_by_site: &[LossMixRow],
        policy: &PolicyConfig,
    ) -> EngineResult<Vec<SiteStatus>> {
        Ok(self
            .classify_detailed(by_site, by_site_day, loss_mix_by_site, policy)?
            .site_status)
    }

    /// 生成站点风险状态表,同时返回异常日明细 (供下钻)
    ///
    /// # 错误
    /// 三张表站点集合不一致时返回 EngineError::SchemaMismatch
    pub fn classify_detailed(
        &self,
        by_site: &[SiteKpi],
        by_site_day: &[SiteDayKpi],
        loss_mix_by_site: &[LossMixRow],
        policy: &PolicyConfig,
    ) -> EngineResult<Classification> {
        self.check_consistency(by_site, by_site_day, loss_mix_by_site)?;

        // 1. 异常日 (诊断信息)
        let anomalies = detect_anomalies(by_site_day, policy.shock_zscore_threshold);
        let anomaly_counts = count_by_site(&anomalies);

        // 2. 按站点归集原因构成
        let mut mix_by_site: BTreeMap<&str, Vec<&LossMixRow>> = BTreeMap::new();
        for row in loss_mix_by_site {
            mix_by_site.entry(row.site_id.as_str()).or_default().push(row);
        }

        // 3. 逐站点分级
        let mut site_status = Vec::with_capacity(by_site.len());
        for site in by_site {
            let mix = mix_by_site
                .get(site.site_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let dominant = self.dominant_loss(mix).ok_or_else(|| EngineError::SchemaMismatch {
                site_id: site.site_id.clone(),
                present_in: TABLE_BY_SITE,
                missing_from: TABLE_LOSS_MIX,
            })?;

            let status = self.assess_status(site.loss_rate_weighted, site.cost_leakage, policy);
            let anomaly_days = anomaly_counts.get(&site.site_id).copied().unwrap_or(0);

            tracing::trace!(
                site_id = %site.site_id,
                %status,
                loss_rate_weighted = site.loss_rate_weighted,
                cost_leakage = site.cost_leakage,
                dominant_loss_reason = %dominant.reason,
                anomaly_days,
                "站点分级"
            );

            site_status.push(SiteStatus {
                site_id: site.site_id.clone(),
                status,
                loss_rate_weighted: site.loss_rate_weighted,
                cost_leakage: site.cost_leakage,
                dominant_loss_reason: dominant.reason,
                dominant_loss_share: dominant.share,
                recommended_action: recommended_action(status, dominant.reason, anomaly_days),
                shock_days: site.shock_days,
                anomaly_days,
            });
        }

        // 4. 风险排序
        site_status.sort_by(|a, b| a.severity_cmp(b));

        Ok(Classification {
            site_status,
            anomalies,
        })
    }

    // ==========================================
    // 分级规则
    // ==========================================

    /// 评估风险等级 (先命中先返回)
    ///
    /// 规则:
    /// - Intervention Required: 加权损耗率 >= 干预阈值 OR 成本泄漏 >= 干预阈值
    /// - Watch: 加权损耗率 >= 关注阈值 OR 成本泄漏 >= 关注阈值
    /// - Normal: 其他
    pub fn assess_status(
        &self,
        loss_rate_weighted: f64,
        cost_leakage: f64,
        policy: &PolicyConfig,
    ) -> RiskStatus {
        if loss_rate_weighted >= policy.intervention_loss_rate
            || cost_leakage >= policy.intervention_cost_leakage
        {
            return RiskStatus::InterventionRequired;
        }

        if loss_rate_weighted >= policy.watch_loss_rate || cost_leakage >= policy.watch_cost_leakage
        {
            return RiskStatus::Watch;
        }

        RiskStatus::Normal
    }

    /// 计算主导损耗原因
    ///
    /// 报废量最大者胜出;并列时按枚举顺序取靠前者。
    /// 站点无任何原因行时返回 None。
    pub fn dominant_loss(&self, mix: &[&LossMixRow]) -> Option<DominantLoss> {
        let mut by_reason: BTreeMap<LossReason, u64> = BTreeMap::new();
        for row in mix {
            *by_reason.entry(row.loss_reason).or_insert(0) += row.disposed_units;
        }

        let total: u64 = by_reason.values().sum();
        let mut best: Option<(LossReason, u64)> = None;
        for (reason, disposed) in by_reason {
            match best {
                Some((_, best_disposed)) if disposed <= best_disposed => {}
                _ => best = Some((reason, disposed)),
            }
        }

        best.map(|(reason, disposed)| DominantLoss {
            reason,
            share: ratio(disposed, total),
        })
    }

    // ==========================================
    // 一致性校验
    // ==========================================

    /// 校验三张表站点集合一致
    fn check_consistency(
        &self,
        by_site: &[SiteKpi],
        by_site_day: &[SiteDayKpi],
        loss_mix_by_site: &[LossMixRow],
    ) -> EngineResult<()> {
        let sites: BTreeSet<&str> = by_site.iter().map(|s| s.site_id.as_str()).collect();
        let day_sites: BTreeSet<&str> = by_site_day.iter().map(|d| d.site_id.as_str()).collect();
        let mix_sites: BTreeSet<&str> =
            loss_mix_by_site.iter().map(|m| m.site_id.as_str()).collect();

        let checks = [
            (&sites, TABLE_BY_SITE, &mix_sites, TABLE_LOSS_MIX),
            (&sites, TABLE_BY_SITE, &day_sites, TABLE_BY_SITE_DAY),
            (&mix_sites, TABLE_LOSS_MIX, &sites, TABLE_BY_SITE),
            (&day_sites, TABLE_BY_SITE_DAY, &sites, TABLE_BY_SITE),
        ];

        for (present, present_in, other, missing_from) in checks {
            if let Some(site_id) = present.difference(other).next() {
                return Err(EngineError::SchemaMismatch {
                    site_id: site_id.to_string(),
                    present_in,
                    missing_from,
                });
            }
        }

        Ok(())
    }
}

impl Default for SiteClassifier {
    fn default() -> Self {
        Self::new()
    }
}
