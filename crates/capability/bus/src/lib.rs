//! 消息总线：上行遥测与下行命令共用的发布通道。
//!
//! 发布为即发即弃：失败只返回错误并记录日志，不做重试。

mod memory;
mod mqtt;

pub use memory::{BusMessage, MemoryBus};
pub use mqtt::{MqttBus, MqttBusConfig};

use async_trait::async_trait;

/// 总线错误。
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("payload error: {0}")]
    Payload(String),
}

/// 发布器抽象。
#[async_trait]
pub trait BusPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError>;
}

/// 空发布器（关闭 MQTT 时使用）。
#[derive(Debug, Default)]
pub struct NoopBus;

#[async_trait]
impl BusPublisher for NoopBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        tracing::debug!(
            target: "hab.bus",
            topic = %topic,
            payload_size = payload.len(),
            "noop_publish"
        );
        Ok(())
    }
}
