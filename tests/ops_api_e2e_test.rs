// ==========================================
// OpsApi 端到端测试
// ==========================================
// 测试目标: 配置 → 文件数据源 → 全量/筛选分析 → 报表导出
// ==========================================

mod helpers;

use helpers::fixture_files::write_daily_csv;
use helpers::record_builder::{day, RecordBuilder};
use site_resource_ops::api::export::{ExportManifest, MANIFEST_FILENAME};
use site_resource_ops::api::ops_api::{SCOPE_ALL, SCOPE_FILTERED};
use site_resource_ops::config::config_keys;
use site_resource_ops::domain::types::{LossReason, RiskStatus};
use site_resource_ops::{logging, ApiError, ConfigManager, DailyRecord, OpsApi};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

fn create_test_records() -> Vec<DailyRecord> {
    let mut records = Vec::new();
    for d in 1..=5 {
        records.push(RecordBuilder::new("S001", day(d)).actual(1000).disposed(30).build());
        records.push(
            RecordBuilder::new("S002", day(d))
                .actual(1000)
                .disposed(100)
                .unit_cost(12.0)
                .reason(LossReason::Spoilage)
                .build(),
        );
    }
    records.push(
        RecordBuilder::new("S003", day(1))
            .actual(2000)
            .disposed(130)
            .reason(LossReason::Damage)
            .temp_excursion()
            .build(),
    );
    records
}

fn create_config(dir: &Path, extra: &[(&str, &str)]) -> ConfigManager {
    let data = write_daily_csv(dir, "daily_site_resource.csv", &create_test_records());
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(config_keys::DAILY_DATA_PATH.to_string(), data.display().to_string());
    vars.insert(
        config_keys::SITE_MASTER_PATH.to_string(),
        dir.join("site_master.csv").display().to_string(),
    );
    vars.insert(
        config_keys::REPORTS_DIR.to_string(),
        dir.join("reports").display().to_string(),
    );
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    ConfigManager::from_sources(&vars, None).unwrap()
}

#[tokio::test]
async fn test_full_flow_all_scope() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let config = create_config(dir.path(), &[]);
    let api = OpsApi::from_config(&config).unwrap();

    let run = api.run(config.scope()).await.unwrap();
    assert_eq!(run.record_count, 11);

    let statuses: Vec<(&str, RiskStatus)> = run
        .all
        .site_status
        .iter()
        .map(|s| (s.site_id.as_str(), s.status))
        .collect();
    // S002: 10% → IR;S003: 6.5% → Watch;S001: 3% → Normal
    assert_eq!(
        statuses,
        vec![
            ("S002", RiskStatus::InterventionRequired),
            ("S003", RiskStatus::Watch),
            ("S001", RiskStatus::Normal),
        ]
    );
    assert_eq!(run.all.overall.shock_days, 1);
    assert_eq!(run.all, run.filtered);
}

#[tokio::test]
async fn test_filtered_scope_is_independent() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let config = create_config(
        dir.path(),
        &[
            (config_keys::FILTER_SITES, "S001,S003"),
            (config_keys::FILTER_END, "2025-01-03"),
        ],
    );
    let api = OpsApi::from_config(&config).unwrap();

    let run = api.run(config.scope()).await.unwrap();
    assert_eq!(run.all.overall.record_count, 11);
    assert_eq!(run.filtered.overall.record_count, 4);
    assert!(run.filtered.by_site.iter().all(|s| s.site_id != "S002"));
    assert!(run.filtered.by_site_day.iter().all(|d| d.date <= day(3)));
}

#[tokio::test]
async fn test_export_is_reproducible() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let config = create_config(dir.path(), &[(config_keys::FILTER_SITES, "S002")]);
    let api = OpsApi::from_config(&config).unwrap();

    let first = api.run(config.scope()).await.unwrap();
    let manifests = api.export(&first).unwrap();
    let reports = dir.path().join("reports");
    let snapshot: Vec<Vec<u8>> = manifests[0]
        .files
        .iter()
        .map(|f| std::fs::read(reports.join(SCOPE_ALL).join(f)).unwrap())
        .collect();

    let second = api.run(config.scope()).await.unwrap();
    let again = api.export(&second).unwrap();
    assert_ne!(manifests[0].run_id, again[0].run_id);
    for (file, before) in manifests[0].files.iter().zip(&snapshot) {
        let after = std::fs::read(reports.join(SCOPE_ALL).join(file)).unwrap();
        assert_eq!(&after, before, "{} changed between runs", file);
    }

    let body = std::fs::read_to_string(reports.join(SCOPE_FILTERED).join(MANIFEST_FILENAME)).unwrap();
    let manifest: ExportManifest = serde_json::from_str(&body).unwrap();
    assert_eq!(manifest.scope, SCOPE_FILTERED);
    assert_eq!(manifest.counts.by_site, 1);
    assert_eq!(manifest.policy, *api.policy());
}

#[tokio::test]
async fn test_missing_data_file() {
    let dir = TempDir::new().unwrap();
    let mut vars = HashMap::new();
    vars.insert(
        config_keys::DAILY_DATA_PATH.to_string(),
        dir.path().join("absent.csv").display().to_string(),
    );
    let config = ConfigManager::from_sources(&vars, None).unwrap();
    let api = OpsApi::from_config(&config).unwrap();

    let err = api.run(config.scope()).await.unwrap_err();
    assert!(matches!(err, ApiError::Import(_)));
    assert!(!err.is_data_error());
}
