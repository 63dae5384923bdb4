//! # 设备协议能力模块
//!
//! - **uplink**：设备快照 → 上行遥测载荷（JSON）
//! - **frame / command**：控制意图 → 状态变更 + 下行二进制帧
//! - **envelope**：下行帧的 LoRaWAN 信封（base64）
//!
//! ```text
//! 控制参数 ──► intent（校验） ──► command::apply_*（持锁变更） ──► Frame
//!                                                                    │
//!                                                                    ▼
//!                                                         DownlinkEnvelope ──► bus
//! ```

pub mod command;
mod envelope;
mod error;
mod frame;
mod intent;
mod topic;
pub mod uplink;

pub use envelope::{DEFAULT_FPORT, DownlinkEnvelope};
pub use error::ProtocolError;
pub use frame::Frame;
pub use intent::*;
pub use topic::{downlink_topic, uplink_topic};
