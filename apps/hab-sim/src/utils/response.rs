//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 控制接口：统一 ApiResponse JSON，错误码与状态码一一对应
//! - 轮询接口：纯文本，404 时返回资源名提示

use api_contract::{ApiResponse, ControlResultDto, SentCommandDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hab_control::{ControlError, ControlOutcome};
use hab_storage::StorageError;

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", message.into())),
    )
        .into_response()
}

/// 下发失败响应（状态变更已生效，不回滚）
pub fn dispatch_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.DISPATCH", message.into())),
    )
        .into_response()
}

pub fn control_error(err: ControlError) -> Response {
    match err {
        ControlError::Validation(message) => bad_request_error(message),
        ControlError::NotFound(err) => not_found_error(err.to_string()),
        ControlError::Dispatch(message) => dispatch_error(message),
    }
}

/// 轮询接口的未找到响应（纯文本）
pub fn text_error(err: StorageError) -> Response {
    (StatusCode::NOT_FOUND, err.to_string()).into_response()
}

/// ControlOutcome 转 ControlResultDto
pub fn outcome_to_dto(outcome: ControlOutcome) -> ControlResultDto {
    ControlResultDto {
        status: outcome.status,
        commands: outcome
            .commands
            .into_iter()
            .map(|sent| SentCommandDto {
                data: sent.frame.to_base64(),
                hex: sent.frame.to_hex(),
                topic: sent.topic,
            })
            .collect(),
        new_state: outcome.new_state.to_json(),
    }
}
