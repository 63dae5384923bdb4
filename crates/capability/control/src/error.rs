//! 控制链路错误类型定义

use hab_protocol::ProtocolError;
use hab_storage::StorageError;

/// 控制链路错误。
///
/// 校验错误与未找到错误都发生在任何状态变更之前；
/// 下发错误发生在变更之后，内存状态不回滚。
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ControlError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    NotFound(#[from] StorageError),
    #[error("dispatch error: {0}")]
    Dispatch(String),
}

impl ControlError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<ProtocolError> for ControlError {
    fn from(err: ProtocolError) -> Self {
        Self::Validation(err.to_string())
    }
}
