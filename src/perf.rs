use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Instant;

// 0 = 未初始化, 1 = 关闭, 2 = 开启
static PERF_LOG_STATE: AtomicU8 = AtomicU8::new(0);
static PERF_LOG_FORCED: AtomicBool = AtomicBool::new(false);

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 性能日志开关
///
/// - Debug 默认开启;Release 默认关闭
/// - `OPS_PERF_LOG=1` 强制开启,`OPS_PERF_LOG=0` 强制关闭
pub fn perf_log_enabled() -> bool {
    if PERF_LOG_FORCED.load(Ordering::Relaxed) {
        return true;
    }
    match PERF_LOG_STATE.load(Ordering::Relaxed) {
        1 => false,
        2 => true,
        _ => {
            let enabled = match std::env::var("OPS_PERF_LOG") {
                Ok(v) => is_true(&v),
                Err(_) => cfg!(debug_assertions),
            };
            PERF_LOG_STATE.store(if enabled { 2 } else { 1 }, Ordering::Relaxed);
            enabled
        }
    }
}

/// 运行时强制开启 (测试 / 诊断用)
pub fn force_enable() {
    PERF_LOG_FORCED.store(true, Ordering::Relaxed);
}

/// 性能统计 Guard:记录 elapsed_ms
///
/// 使用方式:
/// ```ignore
/// let _perf = site_resource_ops::perf::PerfGuard::new("engine.run_analysis");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        if !perf_log_enabled() {
            return;
        }
        let elapsed_ms = self.elapsed_ms();
        tracing::info!(target: "perf", op = self.op, elapsed_ms, "done");
    }
}
