// ==========================================
// 站点资源运营系统 - 配置管理器
// ==========================================
// 职责: 配置加载、校验、多级覆写
// 来源: 默认值 → 策略文件 (JSON) → 环境变量 (OPS_*)
// ==========================================

use crate::config::policy::PolicyConfig;
use crate::config::ConfigError;
use crate::engine::pipeline::ScopeFilter;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 分级阈值
    pub const WATCH_LOSS_RATE: &str = "OPS_WATCH_LOSS_RATE";
    pub const INTERVENTION_LOSS_RATE: &str = "OPS_INTERVENTION_LOSS_RATE";
    pub const WATCH_COST_LEAKAGE: &str = "OPS_WATCH_COST_LEAKAGE";
    pub const INTERVENTION_COST_LEAKAGE: &str = "OPS_INTERVENTION_COST_LEAKAGE";

    // 异常检测
    pub const SHOCK_ZSCORE_THRESHOLD: &str = "OPS_SHOCK_ZSCORE_THRESHOLD";

    // 策略文件
    pub const POLICY_FILE: &str = "OPS_POLICY_FILE";

    // 数据环境 (sample / raw)
    pub const DATA_DIR: &str = "OPS_DATA_DIR";
    pub const DAILY_DATA_PATH: &str = "OPS_DAILY_DATA_PATH";
    pub const SITE_MASTER_PATH: &str = "OPS_SITE_MASTER_PATH";
    pub const REPORTS_DIR: &str = "OPS_REPORTS_DIR";

    // 作用域过滤
    pub const FILTER_SITES: &str = "OPS_FILTER_SITES";
    pub const FILTER_START: &str = "OPS_FILTER_START";
    pub const FILTER_END: &str = "OPS_FILTER_END";

    // 控制台语言 (zh-CN / en)
    pub const LOCALE: &str = "OPS_LOCALE";
}

pub const DEFAULT_DATA_ENV: &str = "sample";
pub const DAILY_DATA_FILENAME: &str = "daily_site_resource.csv";
pub const SITE_MASTER_FILENAME: &str = "site_master.csv";
pub const DEFAULT_REPORTS_DIR: &str = "reports";
const POLICY_FILENAME: &str = "policy.json";
const APP_CONFIG_DIR: &str = "site-resource-ops";

// ==========================================
// ConfigLayer - 配置来源层级
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigLayer {
    Default,    // 内置默认值
    PolicyFile, // 策略文件
    Env,        // 环境变量
}

// ==========================================
// DataPaths - 数据与报告路径
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub data_env: String,
    pub daily_data_path: PathBuf,
    pub site_master_path: PathBuf,
    pub reports_dir: PathBuf,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    policy: PolicyConfig,
    policy_layer: ConfigLayer,
    paths: DataPaths,
    scope: ScopeFilter,
}

impl ConfigManager {
    /// 从进程环境加载
    ///
    /// 未设置 OPS_POLICY_FILE 时,尝试用户配置目录下的
    /// `site-resource-ops/policy.json` (存在才读取)
    pub fn load() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(&vars, default_policy_file())
    }

    /// 从给定变量表加载 (便于测试)
    ///
    /// # 参数
    /// - vars: 环境变量表
    /// - fallback_policy_file: 未显式指定策略文件时的候选路径
    pub fn from_sources(
        vars: &HashMap<String, String>,
        fallback_policy_file: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        // 1. 默认值
        let mut policy = PolicyConfig::default();
        let mut policy_layer = ConfigLayer::Default;

        // 2. 策略文件
        let policy_file = match get(config_keys::POLICY_FILE) {
            Some(path) => Some(PathBuf::from(path)),
            None => fallback_policy_file.filter(|p| p.exists()),
        };
        if let Some(path) = policy_file {
            policy = read_policy_file(&path)?;
            policy_layer = ConfigLayer::PolicyFile;
            tracing::info!(path = %path.display(), "策略文件加载完成");
        }

        // 3. 环境变量
        let overrides: [(&str, &mut f64); 5] = [
            (config_keys::WATCH_LOSS_RATE, &mut policy.watch_loss_rate),
            (config_keys::INTERVENTION_LOSS_RATE, &mut policy.intervention_loss_rate),
            (config_keys::WATCH_COST_LEAKAGE, &mut policy.watch_cost_leakage),
            (config_keys::INTERVENTION_COST_LEAKAGE, &mut policy.intervention_cost_leakage),
            (config_keys::SHOCK_ZSCORE_THRESHOLD, &mut policy.shock_zscore_threshold),
        ];
        for (key, slot) in overrides {
            if let Some(raw) = get(key) {
                *slot = parse_f64(key, &raw)?;
                policy_layer = ConfigLayer::Env;
            }
        }

        policy.validate()?;

        // 数据路径
        let data_env = get(config_keys::DATA_DIR).unwrap_or_else(|| DEFAULT_DATA_ENV.to_string());
        let data_dir = Path::new("data").join(&data_env);
        let paths = DataPaths {
            daily_data_path: get(config_keys::DAILY_DATA_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(DAILY_DATA_FILENAME)),
            site_master_path: get(config_keys::SITE_MASTER_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(SITE_MASTER_FILENAME)),
            reports_dir: get(config_keys::REPORTS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
            data_env,
        };

        // 作用域过滤
        let scope = ScopeFilter {
            sites: get(config_keys::FILTER_SITES).map(|raw| parse_site_list(&raw)),
            start: get(config_keys::FILTER_START)
                .map(|raw| parse_date(config_keys::FILTER_START, &raw))
                .transpose()?,
            end: get(config_keys::FILTER_END)
                .map(|raw| parse_date(config_keys::FILTER_END, &raw))
                .transpose()?,
        };
        if let (Some(start), Some(end)) = (scope.start, scope.end) {
            if start > end {
                return Err(ConfigError::InvalidValue {
                    key: config_keys::FILTER_START.to_string(),
                    value: start.to_string(),
                    message: format!("起始日期晚于截止日期 {}", end),
                });
            }
        }

        Ok(Self {
            policy,
            policy_layer,
            paths,
            scope,
        })
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// 策略最终生效的最高层级
    pub fn policy_layer(&self) -> ConfigLayer {
        self.policy_layer
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn scope(&self) -> &ScopeFilter {
        &self.scope
    }
}

/// 用户配置目录下的默认策略文件
pub fn default_policy_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR).join(POLICY_FILENAME))
}

fn read_policy_file(path: &Path) -> Result<PolicyConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::FileParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_f64(key: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.replace('_', "")
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: e.to_string(),
        })
}

fn parse_date(key: &str, raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}

fn parse_site_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
