// ==========================================
// 站点资源运营系统 - 命令行入口
// ==========================================
// 流程: 加载配置 → 加载数据 → 全量/筛选分析 → 控制台摘要 → 报表导出
// 配置: 见 config::config_keys (OPS_* 环境变量)
// ==========================================

use anyhow::Context;
use site_resource_ops::api::ops_api::{DashboardRun, DashboardViews, TOP_SITES};
use site_resource_ops::config::config_keys;
use site_resource_ops::engine::AnalysisOutput;
use site_resource_ops::i18n::{reason_label, set_locale, status_label, t, t_with_args};
use site_resource_ops::{logging, ConfigManager, OpsApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    if let Ok(locale) = std::env::var(config_keys::LOCALE) {
        set_locale(locale.trim());
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", site_resource_ops::APP_NAME, site_resource_ops::VERSION);
    tracing::info!("==================================================");

    let config = ConfigManager::load().context("配置加载失败")?;
    tracing::info!(
        layer = ?config.policy_layer(),
        data = %config.paths().daily_data_path.display(),
        "配置加载完成"
    );

    let api = OpsApi::from_config(&config)?;
    let run = api.run(config.scope()).await?;

    print_summary(&run);

    let manifests = api.export(&run)?;
    for manifest in &manifests {
        tracing::info!(run_id = %manifest.run_id, scope = %manifest.scope, "manifest 已写入");
    }
    println!();
    let reports_dir = api.reports_dir().display().to_string();
    println!(
        "{}",
        t_with_args("summary.exported", &[("path", reports_dir.as_str())])
    );

    Ok(())
}

fn print_summary(run: &DashboardRun) {
    let count = run.record_count.to_string();
    println!("{}", t_with_args("summary.records_loaded", &[("count", count.as_str())]));
    if run.dq_report.summary.warning > 0 {
        let warnings = run.dq_report.summary.warning.to_string();
        println!("{}", t_with_args("summary.dq_warnings", &[("count", warnings.as_str())]));
    }

    print_scope(&t("summary.scope_all"), &run.all);
    if !run.scope.is_all() {
        print_scope(&t("summary.scope_filtered"), &run.filtered);
    }
}

fn print_scope(title: &str, output: &AnalysisOutput) {
    println!();
    println!("== {} ==", title);

    if output.overall.record_count == 0 {
        println!("{}", t("summary.empty_scope"));
        return;
    }

    let overall = &output.overall;
    println!("{}", t("summary.overall_header"));
    println!("  {}: {:.2}", t("summary.cost_leakage"), overall.cost_leakage);
    println!("  {}: {:.2}%", t("summary.avg_loss_rate"), overall.avg_loss_rate * 100.0);
    println!(
        "  {}: {:.2}%",
        t("summary.avg_utilization_rate"),
        overall.avg_utilization_rate * 100.0
    );
    println!("  {}: {}", t("summary.shock_days"), overall.shock_days);

    let views = DashboardViews::of(output, TOP_SITES);
    let mix: Vec<String> = views
        .loss_mix
        .iter()
        .map(|m| format!("{} {:.1}%", reason_label(m.loss_reason), m.disposed_share * 100.0))
        .collect();
    println!("  {}", mix.join(" | "));

    println!();
    println!("{}", t("summary.status_header"));
    for status in output.site_status.iter().take(TOP_SITES) {
        println!(
            "  {:<10} {:<14} {:>7.2}% {:>12.2}  {:<16} {}",
            status.site_id,
            status_label(status.status),
            status.loss_rate_weighted * 100.0,
            status.cost_leakage,
            reason_label(status.dominant_loss_reason),
            status.recommended_action
        );
    }
    let anomalies = output.anomalies.len().to_string();
    println!("{}", t_with_args("summary.anomalies", &[("count", anomalies.as_str())]));
}
