//! 遥测上报：快照 → 上行载荷 → 总线。
//!
//! 控制命令成功后的延迟重发以独立任务提交给 [`TaskTracker`]，
//! 进程退出时通过 [`CancellationToken`] 一并取消。重叠的延迟任务不去重，
//! 每次都重新读取当前状态。

use domain::{DeviceCategory, DeviceSnapshot, SiteConfig};
use hab_bus::{BusError, BusPublisher};
use hab_protocol::{uplink, uplink_topic};
use hab_storage::{DeviceStateStore, StorageError};
use hab_telemetry::{record_deferred_report, record_uplink_failed, record_uplink_published};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// 上报错误。
#[derive(Debug, thiserror::Error)]
pub enum UplinkError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("payload error: {0}")]
    Payload(String),
}

/// 上报配置。
#[derive(Debug, Clone)]
pub struct UplinkConfig {
    pub topic_prefix: String,
    /// 控制命令之后重发遥测的延迟（模拟设备上报时延）。
    pub republish_delay: Duration,
}

#[derive(Clone)]
pub struct UplinkReporter {
    store: Arc<DeviceStateStore>,
    site: Arc<SiteConfig>,
    bus: Arc<dyn BusPublisher>,
    config: UplinkConfig,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl UplinkReporter {
    pub fn new(
        config: UplinkConfig,
        store: Arc<DeviceStateStore>,
        site: Arc<SiteConfig>,
        bus: Arc<dyn BusPublisher>,
    ) -> Self {
        Self {
            store,
            site,
            bus,
            config,
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// 读取当前快照并立即上报。
    pub async fn report(
        &self,
        apartment_id: &str,
        category: DeviceCategory,
        room: Option<&str>,
    ) -> Result<(), UplinkError> {
        let apartment = self
            .site
            .apartment(apartment_id)
            .ok_or_else(|| StorageError::ApartmentNotFound(apartment_id.to_string()))?;
        let snapshot = self.store.snapshot(apartment_id, category, room)?;
        let device_id = apartment.device_id(category, room);
        self.publish_snapshot(&device_id, &snapshot).await
    }

    /// 上报一份已取得的快照（仿真任务在释放记录锁后调用）。
    pub async fn publish_snapshot(
        &self,
        device_id: &str,
        snapshot: &DeviceSnapshot,
    ) -> Result<(), UplinkError> {
        let topic = uplink_topic(&self.config.topic_prefix, device_id);
        let payload = serde_json::to_vec(&uplink::render(device_id, snapshot))
            .map_err(|err| UplinkError::Payload(err.to_string()))?;
        match self.bus.publish(&topic, payload).await {
            Ok(()) => {
                record_uplink_published();
                debug!(
                    target: "hab.uplink",
                    device_id = %device_id,
                    category = %snapshot.category(),
                    topic = %topic,
                    "uplink_published"
                );
                Ok(())
            }
            Err(err) => {
                record_uplink_failed();
                warn!(
                    target: "hab.uplink",
                    device_id = %device_id,
                    topic = %topic,
                    error = %err,
                    "uplink_publish_failed"
                );
                Err(err.into())
            }
        }
    }

    /// 延迟上报；失败只记录日志。
    pub fn report_later(&self, apartment_id: &str, category: DeviceCategory, room: Option<&str>) {
        let reporter = self.clone();
        let apartment_id = apartment_id.to_string();
        let room = room.map(str::to_string);
        let delay = self.config.republish_delay;
        record_deferred_report();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = reporter.cancel.cancelled() => {
                    debug!(
                        target: "hab.uplink",
                        apartment_id = %apartment_id,
                        category = %category,
                        "deferred_report_cancelled"
                    );
                }
                _ = tokio::time::sleep(delay) => {
                    // 发布失败已在 publish_snapshot 中记录，这里只需处理存储错误。
                    if let Err(UplinkError::Storage(err)) =
                        reporter.report(&apartment_id, category, room.as_deref()).await
                    {
                        warn!(
                            target: "hab.uplink",
                            apartment_id = %apartment_id,
                            category = %category,
                            error = %err,
                            "deferred_report_failed"
                        );
                    }
                }
            }
        });
    }

    /// 尚未完成的延迟任务数。
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// 仿真任务与延迟任务共用的取消信号。
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 取消全部延迟任务并等待其退出。
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}
