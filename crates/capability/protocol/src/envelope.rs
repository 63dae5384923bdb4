//! 下行信封。

use serde::Serialize;

use crate::frame::Frame;

/// 默认 LoRaWAN 端口。
pub const DEFAULT_FPORT: u8 = 85;

/// `{confirmed: true, fport, data: base64(frame)}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownlinkEnvelope {
    pub confirmed: bool,
    pub fport: u8,
    pub data: String,
}

impl DownlinkEnvelope {
    pub fn new(frame: &Frame, fport: u8) -> Self {
        Self {
            confirmed: true,
            fport,
            data: frame.to_base64(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
