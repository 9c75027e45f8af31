// ==========================================
// 站点资源运营系统 - 配置层
// ==========================================
// 职责: 策略阈值 / 数据路径 / 作用域过滤 配置,支持多级覆写
// 覆写顺序: 默认值 → 策略文件 (JSON) → 环境变量
// ==========================================

pub mod config_manager;
pub mod policy;

use thiserror::Error;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigLayer, ConfigManager, DataPaths};
pub use policy::PolicyConfig;

/// 配置错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置文件读取失败 ({path}): {message}")]
    FileRead { path: String, message: String },

    #[error("配置文件解析失败 ({path}): {message}")]
    FileParse { path: String, message: String },
}
