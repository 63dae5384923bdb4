//! 轮询 handlers（纯文本）
//!
//! - GET /{apartment}/items/{item}/state
//! - GET /{apartment}/items/{item}/{room}/state

use crate::AppState;
use crate::utils::response::text_error;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{DeviceCategory, ItemLookup, resolve_item, resolve_switch_item};
use hab_storage::StorageError;

const SWITCH_ROOM_HINT: &str = "This switch item requires a room segment in the URL. \
Use /<apartment>/items/<item_name>/<room>/state";

#[derive(serde::Deserialize)]
pub struct ItemPath {
    pub apartment: String,
    pub item_name: String,
}

#[derive(serde::Deserialize)]
pub struct RoomItemPath {
    pub apartment: String,
    pub item_name: String,
    pub room: String,
}

/// 读取公寓级设备字段
pub async fn get_item_state(State(state): State<AppState>, Path(path): Path<ItemPath>) -> Response {
    if let Err(err) = state.store.apartment(&path.apartment) {
        return text_error(err);
    }
    match resolve_item(&path.item_name) {
        ItemLookup::Field { category, field } => {
            match state
                .store
                .read_field(&path.apartment, category, None, &field)
            {
                Ok(value) => value.to_string().into_response(),
                Err(err) => text_error(err),
            }
        }
        ItemLookup::RequiresRoom => (StatusCode::BAD_REQUEST, SWITCH_ROOM_HINT).into_response(),
        ItemLookup::Unknown => text_error(StorageError::FieldNotFound(path.item_name)),
    }
}

/// 读取墙壁开关字段
pub async fn get_room_item_state(
    State(state): State<AppState>,
    Path(path): Path<RoomItemPath>,
) -> Response {
    let records = match state.store.apartment(&path.apartment) {
        Ok(records) => records,
        Err(err) => return text_error(err),
    };
    if let Err(err) = records.switch(&path.room) {
        return text_error(err);
    }
    match resolve_switch_item(&path.item_name) {
        ItemLookup::Field { category, field } if category == DeviceCategory::WallSwitch => {
            match state
                .store
                .read_field(&path.apartment, category, Some(&path.room), &field)
            {
                Ok(value) => value.to_string().into_response(),
                Err(err) => text_error(err),
            }
        }
        _ => text_error(StorageError::FieldNotFound(path.item_name)),
    }
}
