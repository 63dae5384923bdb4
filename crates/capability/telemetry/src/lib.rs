//! 追踪、请求 ID 生成与进程级计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub uplinks_published: u64,
    pub uplinks_failed: u64,
    pub downlinks_published: u64,
    pub downlinks_failed: u64,
    pub control_accepted: u64,
    pub control_rejected: u64,
    pub simulation_ticks: u64,
    pub deferred_reports: u64,
}

/// 进程级计数指标。
pub struct TelemetryMetrics {
    uplinks_published: AtomicU64,
    uplinks_failed: AtomicU64,
    downlinks_published: AtomicU64,
    downlinks_failed: AtomicU64,
    control_accepted: AtomicU64,
    control_rejected: AtomicU64,
    simulation_ticks: AtomicU64,
    deferred_reports: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            uplinks_published: AtomicU64::new(0),
            uplinks_failed: AtomicU64::new(0),
            downlinks_published: AtomicU64::new(0),
            downlinks_failed: AtomicU64::new(0),
            control_accepted: AtomicU64::new(0),
            control_rejected: AtomicU64::new(0),
            simulation_ticks: AtomicU64::new(0),
            deferred_reports: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uplinks_published: self.uplinks_published.load(Ordering::Relaxed),
            uplinks_failed: self.uplinks_failed.load(Ordering::Relaxed),
            downlinks_published: self.downlinks_published.load(Ordering::Relaxed),
            downlinks_failed: self.downlinks_failed.load(Ordering::Relaxed),
            control_accepted: self.control_accepted.load(Ordering::Relaxed),
            control_rejected: self.control_rejected.load(Ordering::Relaxed),
            simulation_ticks: self.simulation_ticks.load(Ordering::Relaxed),
            deferred_reports: self.deferred_reports.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录上行遥测发布成功次数。
pub fn record_uplink_published() {
    metrics().uplinks_published.fetch_add(1, Ordering::Relaxed);
}

/// 记录上行遥测发布失败次数。
pub fn record_uplink_failed() {
    metrics().uplinks_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录下行命令发布成功次数。
pub fn record_downlink_published() {
    metrics()
        .downlinks_published
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录下行命令发布失败次数。
pub fn record_downlink_failed() {
    metrics().downlinks_failed.fetch_add(1, Ordering::Relaxed);
}

pub fn record_control_accepted() {
    metrics().control_accepted.fetch_add(1, Ordering::Relaxed);
}

/// 记录被拒绝的控制请求（校验失败或资源不存在）。
pub fn record_control_rejected() {
    metrics().control_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录仿真周期（每类设备每个周期计一次）。
pub fn record_simulation_tick() {
    metrics().simulation_ticks.fetch_add(1, Ordering::Relaxed);
}

pub fn record_deferred_report() {
    metrics().deferred_reports.fetch_add(1, Ordering::Relaxed);
}
