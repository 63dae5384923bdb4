//! 仿真公寓的领域模型：站点配置、设备记录、门锁状态推导与轮询条目解析。

pub mod apartment;
pub mod door_lock;
pub mod items;
pub mod records;
pub mod value;

pub use apartment::{ApartmentConfig, DeviceCategory, DeviceIds, SiteConfig, SiteConfigError};
pub use door_lock::{DEFAULT_RELOCK_SECONDS, LockStatus, lock_status, relock_window};
pub use items::{ItemLookup, resolve_item, resolve_switch_item};
pub use records::{
    AqiState, ApartmentState, CircuitBreakerState, CurtainState, DeviceSnapshot, DoorLockState,
    FanSetting, MeterState, PeopleCounterState, PowerState, SocketState, ThermostatMode,
    ThermostatState, WallSwitchState,
};
pub use value::FieldValue;

use chrono::{DateTime, SecondsFormat, Utc};

/// 以 ISO-8601（微秒精度，`+00:00` 偏移）格式输出 UTC 时间。
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// 四舍五入到指定小数位。
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
