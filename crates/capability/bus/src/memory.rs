//! 内存发布器：记录所有消息，仅用于本地测试。

use crate::{BusError, BusPublisher};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// 一条已发布的消息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn json(&self) -> Result<serde_json::Value, BusError> {
        serde_json::from_slice(&self.payload).map_err(|err| BusError::Payload(err.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryBus {
    messages: Mutex<Vec<BusMessage>>,
    failing: AtomicBool,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开后所有发布都返回错误，用于模拟总线故障。
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<BusMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages_on(&self, topic: &str) -> Vec<BusMessage> {
        self.messages()
            .into_iter()
            .filter(|message| message.topic == topic)
            .collect()
    }

    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl BusPublisher for MemoryBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BusError::Publish("memory bus offline".to_string()));
        }
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(BusMessage {
                topic: topic.to_string(),
                payload,
            });
        Ok(())
    }
}
