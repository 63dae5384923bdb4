//! 存储层错误类型
//!
//! 资源不存在与参数校验错误需要区分，上层据此映射为 404。

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Apartment not found")]
    ApartmentNotFound(String),
    #[error("Room not found")]
    RoomNotFound(String),
    #[error("Item not found")]
    FieldNotFound(String),
}
