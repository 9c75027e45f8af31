// ==========================================
// 配置层集成测试
// ==========================================
// 测试目标: 默认值 → 策略文件 → 环境变量 覆写顺序与校验
// ==========================================

use site_resource_ops::config::{config_keys, ConfigError, ConfigLayer, ConfigManager, PolicyConfig};
use std::collections::HashMap;
use tempfile::TempDir;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_fallback_policy_file_used_when_present() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.json");
    std::fs::write(&path, r#"{"watch_cost_leakage": 10000, "intervention_cost_leakage": 20000}"#).unwrap();

    let manager = ConfigManager::from_sources(&HashMap::new(), Some(path)).unwrap();
    assert_eq!(manager.policy_layer(), ConfigLayer::PolicyFile);
    assert_eq!(manager.policy().watch_cost_leakage, 10_000.0);
    assert_eq!(manager.policy().watch_loss_rate, PolicyConfig::default().watch_loss_rate);
}

#[test]
fn test_fallback_policy_file_ignored_when_absent() {
    let dir = TempDir::new().unwrap();
    let manager =
        ConfigManager::from_sources(&HashMap::new(), Some(dir.path().join("policy.json"))).unwrap();
    assert_eq!(manager.policy_layer(), ConfigLayer::Default);
}

#[test]
fn test_explicit_policy_file_must_exist() {
    let err = ConfigManager::from_sources(
        &vars(&[(config_keys::POLICY_FILE, "/nonexistent/policy.json")]),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::FileRead { .. }));
}

#[test]
fn test_malformed_policy_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = ConfigManager::from_sources(&HashMap::new(), Some(path)).unwrap_err();
    assert!(matches!(err, ConfigError::FileParse { .. }));
}

#[test]
fn test_env_thresholds_and_validation() {
    let manager = ConfigManager::from_sources(
        &vars(&[
            (config_keys::WATCH_COST_LEAKAGE, "30_000"),
            (config_keys::INTERVENTION_COST_LEAKAGE, "60000"),
            (config_keys::SHOCK_ZSCORE_THRESHOLD, "3"),
        ]),
        None,
    )
    .unwrap();
    assert_eq!(manager.policy_layer(), ConfigLayer::Env);
    assert_eq!(manager.policy().watch_cost_leakage, 30_000.0);
    assert_eq!(manager.policy().shock_zscore_threshold, 3.0);

    let err = ConfigManager::from_sources(
        &vars(&[(config_keys::WATCH_COST_LEAKAGE, "70000")]),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));

    let err = ConfigManager::from_sources(&vars(&[(config_keys::WATCH_LOSS_RATE, "abc")]), None)
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == config_keys::WATCH_LOSS_RATE));
}

#[test]
fn test_data_env_and_scope_filters() {
    let manager = ConfigManager::from_sources(
        &vars(&[
            (config_keys::DATA_DIR, "raw"),
            (config_keys::FILTER_SITES, "S002, S001,,"),
            (config_keys::FILTER_START, "2025-01-02"),
            (config_keys::FILTER_END, "2025-01-31"),
        ]),
        None,
    )
    .unwrap();

    assert_eq!(manager.paths().data_env, "raw");
    assert!(manager.paths().daily_data_path.ends_with("data/raw/daily_site_resource.csv"));
    assert!(manager.paths().site_master_path.ends_with("data/raw/site_master.csv"));

    let sites: Vec<&str> = manager
        .scope()
        .sites
        .as_ref()
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(sites, vec!["S001", "S002"]);
    assert!(!manager.scope().is_all());

    let err = ConfigManager::from_sources(
        &vars(&[
            (config_keys::FILTER_START, "2025-02-01"),
            (config_keys::FILTER_END, "2025-01-01"),
        ]),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}
