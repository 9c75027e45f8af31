// ==========================================
// 站点资源运营系统 - 风险分级策略配置
// ==========================================
// 职责: 分级阈值 + 异常检测阈值,调用时显式传入引擎
// 红线: 阈值只读,不在引擎内部修改
// ==========================================

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

// ===== 默认值 (示例口径) =====
pub const DEFAULT_WATCH_LOSS_RATE: f64 = 0.055; // 5.5%
pub const DEFAULT_INTERVENTION_LOSS_RATE: f64 = 0.085; // 8.5%
pub const DEFAULT_WATCH_COST_LEAKAGE: f64 = 25_000.0;
pub const DEFAULT_INTERVENTION_COST_LEAKAGE: f64 = 50_000.0;
pub const DEFAULT_SHOCK_ZSCORE_THRESHOLD: f64 = 2.5;

/// 风险分级策略
///
/// 两路信号 (加权损耗率 / 成本泄漏) 以 OR 组合,任一越线即升级
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub watch_loss_rate: f64,
    pub intervention_loss_rate: f64,
    pub watch_cost_leakage: f64,
    pub intervention_cost_leakage: f64,
    pub shock_zscore_threshold: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            watch_loss_rate: DEFAULT_WATCH_LOSS_RATE,
            intervention_loss_rate: DEFAULT_INTERVENTION_LOSS_RATE,
            watch_cost_leakage: DEFAULT_WATCH_COST_LEAKAGE,
            intervention_cost_leakage: DEFAULT_INTERVENTION_COST_LEAKAGE,
            shock_zscore_threshold: DEFAULT_SHOCK_ZSCORE_THRESHOLD,
        }
    }
}

impl PolicyConfig {
    /// 校验阈值
    ///
    /// - 所有阈值有限且非负
    /// - 关注阈值 <= 干预阈值 (两路信号各自)
    /// - z 阈值 > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("watch_loss_rate", self.watch_loss_rate),
            ("intervention_loss_rate", self.intervention_loss_rate),
            ("watch_cost_leakage", self.watch_cost_leakage),
            ("intervention_cost_leakage", self.intervention_cost_leakage),
            ("shock_zscore_threshold", self.shock_zscore_threshold),
        ];
        for (key, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    message: "必须为有限非负数".to_string(),
                });
            }
        }

        if self.watch_loss_rate > self.intervention_loss_rate {
            return Err(ConfigError::InvalidValue {
                key: "watch_loss_rate".to_string(),
                value: self.watch_loss_rate.to_string(),
                message: format!("不得大于 intervention_loss_rate ({})", self.intervention_loss_rate),
            });
        }

        if self.watch_cost_leakage > self.intervention_cost_leakage {
            return Err(ConfigError::InvalidValue {
                key: "watch_cost_leakage".to_string(),
                value: self.watch_cost_leakage.to_string(),
                message: format!(
                    "不得大于 intervention_cost_leakage ({})",
                    self.intervention_cost_leakage
                ),
            });
        }

        if self.shock_zscore_threshold == 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "shock_zscore_threshold".to_string(),
                value: self.shock_zscore_threshold.to_string(),
                message: "必须大于 0".to_string(),
            });
        }

        Ok(())
    }
}
