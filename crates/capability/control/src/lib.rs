//! # 控制链路能力模块
//!
//! 控制请求的处理顺序固定：
//!
//! 1. 查找公寓（及房间），未找到直接返回 [`ControlError::NotFound`]
//! 2. 解析并校验查询参数，得到控制意图（失败不触碰状态）
//! 3. 持记录锁执行 `hab_protocol::command::apply_*`，同时取得新快照
//! 4. 释放锁后逐帧发布下行信封
//! 5. 全部发布成功后提交延迟上报
//!
//! 发布失败不回滚第 3 步的变更，也不提交延迟上报。

mod error;
pub mod params;
mod service;

pub use error::ControlError;
pub use params::{ControlParams, control_category};
pub use service::{ControlConfig, ControlOutcome, ControlService, SentCommand};
