//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 已下发的一条下行命令。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentCommandDto {
    pub topic: String,
    /// base64 编码的帧（即下行信封中的 `data`）。
    pub data: String,
    /// 帧的大写十六进制，便于排查。
    pub hex: String,
}

/// 控制接口返回结构。
///
/// 字段保持 snake_case，与既有网关集成的 `new_state` 约定一致。
#[derive(Debug, Serialize, Deserialize)]
pub struct ControlResultDto {
    pub status: String,
    pub commands: Vec<SentCommandDto>,
    /// 变更后设备记录的完整快照。
    pub new_state: serde_json::Value,
}

/// 计数指标快照。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub uplinks_published: u64,
    pub uplinks_failed: u64,
    pub downlinks_published: u64,
    pub downlinks_failed: u64,
    pub control_accepted: u64,
    pub control_rejected: u64,
    pub simulation_ticks: u64,
    pub deferred_reports: u64,
}

/// 健康检查返回结构。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub apartments: usize,
}
