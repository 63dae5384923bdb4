//! 设备状态存储。
//!
//! 进程内唯一的权威状态：每套公寓一组记录，每条记录独立加锁，
//! 跨类别操作之间互不阻塞。记录在启动时一次性创建，之后只做原地更新。

mod apartment;
mod cell;
mod error;

pub use apartment::ApartmentRecords;
pub use cell::RecordCell;
pub use error::StorageError;

use domain::{ApartmentState, DeviceCategory, DeviceSnapshot, FieldValue};
use std::collections::HashMap;

/// 全站点设备状态。
#[derive(Debug)]
pub struct DeviceStateStore {
    apartments: HashMap<String, ApartmentRecords>,
}

impl DeviceStateStore {
    pub fn new(apartments: impl IntoIterator<Item = (String, ApartmentState)>) -> Self {
        Self {
            apartments: apartments
                .into_iter()
                .map(|(id, state)| (id, ApartmentRecords::new(state)))
                .collect(),
        }
    }

    pub fn apartment(&self, apartment_id: &str) -> Result<&ApartmentRecords, StorageError> {
        self.apartments
            .get(apartment_id)
            .ok_or_else(|| StorageError::ApartmentNotFound(apartment_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.apartments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apartments.is_empty()
    }

    /// `read(apartment, category, [room])`。
    pub fn snapshot(
        &self,
        apartment_id: &str,
        category: DeviceCategory,
        room: Option<&str>,
    ) -> Result<DeviceSnapshot, StorageError> {
        self.apartment(apartment_id)?.snapshot(category, room)
    }

    /// 读取单个字段（轮询接口）。
    pub fn read_field(
        &self,
        apartment_id: &str,
        category: DeviceCategory,
        room: Option<&str>,
        field: &str,
    ) -> Result<FieldValue, StorageError> {
        self.snapshot(apartment_id, category, room)?
            .field(field)
            .ok_or_else(|| StorageError::FieldNotFound(field.to_string()))
    }
}
