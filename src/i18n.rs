// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// 用途: 控制台摘要中的状态 / 损耗原因标签
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::{LossReason, RiskStatus};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use site_resource_ops::i18n::t_with_args;
/// let msg = t_with_args("summary.records_loaded", &[("count", "42")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 风险状态标签
pub fn status_label(status: RiskStatus) -> String {
    t(&format!("status.{}", status_key(status)))
}

/// 损耗原因标签
pub fn reason_label(reason: LossReason) -> String {
    t(&format!("loss_reason.{}", reason.as_code()))
}

fn status_key(status: RiskStatus) -> &'static str {
    match status {
        RiskStatus::Normal => "normal",
        RiskStatus::Watch => "watch",
        RiskStatus::InterventionRequired => "intervention_required",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        // 恢复默认语言
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_status_labels() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(status_label(RiskStatus::Watch), "Watch");
        assert_eq!(
            status_label(RiskStatus::InterventionRequired),
            "Intervention Required"
        );

        set_locale("zh-CN");
        assert_eq!(status_label(RiskStatus::Normal), "正常");
        assert_eq!(status_label(RiskStatus::InterventionRequired), "需干预");
    }

    #[test]
    fn test_reason_labels_cover_all() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        for locale in ["en", "zh-CN"] {
            set_locale(locale);
            for reason in LossReason::ALL {
                let label = reason_label(reason);
                assert!(!label.starts_with("loss_reason."), "missing {} label", locale);
            }
        }
        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("summary.records_loaded", &[("count", "42")]);
        assert!(msg.contains("42"));

        set_locale("zh-CN");
        let msg = t_with_args("summary.records_loaded", &[("count", "42")]);
        assert!(msg.contains("42"));
        assert!(msg.contains("记录"));
    }
}
